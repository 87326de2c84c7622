//! Error types for the service clients.

use thiserror::Error;

/// Errors raised by the cached service clients and their HTTP backends.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The caller passed something the client cannot look up (e.g. no keys).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The upstream service answered with a non-success status.
    #[error("{service} request to {url} failed with status {status}: {body}")]
    RequestFailed {
        service: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connect error, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream response was not the JSON shape we expected.
    #[error("could not decode {service} response from {url}: {reason}")]
    Decode {
        service: &'static str,
        url: String,
        reason: String,
    },
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
