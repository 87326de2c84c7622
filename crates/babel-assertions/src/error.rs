//! Errors raised while evaluating test cases.

use babel_services::ServiceError;
use thiserror::Error;

/// Errors that abort the evaluation of a test case.
///
/// Problems with individual parameter sets are not errors; they are reported
/// as failed [`TestResult`](crate::TestResult)s instead.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The test case names an assertion that is not registered.
    #[error("unknown assertion type '{assertion}' in {label}")]
    UnknownAssertion { assertion: String, label: String },

    /// Two handlers were registered under the same name.
    #[error("assertion '{0}' is registered more than once")]
    DuplicateAssertion(String),

    /// A backend call failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Result type for assertion evaluation.
pub type AssertionResult<T> = Result<T, AssertionError>;
