//! Error types for test declaration sources

use thiserror::Error;

/// Errors raised while discovering test cases or loading targets.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A test declaration could not be understood.
    #[error("invalid test declaration in {origin}: {message}")]
    InvalidDeclaration { origin: String, message: String },

    /// A `babel_tests` YAML block is not valid YAML.
    #[error("invalid babel_tests YAML in {origin}: {error}")]
    InvalidYaml {
        origin: String,
        #[source]
        error: serde_yaml::Error,
    },

    #[error("no GitHub authentication token provided")]
    MissingToken,

    #[error("invalid issue selector '{0}': expected 'org/repo#110', 'repo#110' or '110'")]
    InvalidSelector(String),

    #[error("repository '{0}' is not one of the configured repositories")]
    UnknownRepository(String),

    #[error("issue {repository}#{number} not found")]
    IssueNotFound { repository: String, number: u64 },

    #[error("GitHub API error ({status}) for {url}: {message}")]
    GitHub {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Google Sheet error ({status}) for {url}: {message}")]
    Sheet {
        status: u16,
        url: String,
        message: String,
    },

    #[error("invalid CSV in {origin}: {error}")]
    InvalidCsv {
        origin: String,
        #[source]
        error: csv::Error,
    },

    #[error("invalid test row {row}: {message}")]
    InvalidRow { row: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("unknown target '{name}', expected one of: {}", available.join(", "))]
    UnknownTarget {
        name: String,
        available: Vec<String>,
    },
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;
