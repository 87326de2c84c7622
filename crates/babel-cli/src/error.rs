//! CLI error types

use babel_assertions::AssertionError;
use babel_services::ServiceError;
use babel_sources::SourceError;
use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Assertion(#[from] AssertionError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The generated assertion docs differ from the file on disk.
    #[error("{0} is out of date; regenerate it with `babel-validate docs --path {0}`")]
    DocsOutOfDate(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
