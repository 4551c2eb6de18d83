use std::time::Duration;
use thiserror::Error;

/// Failures an observer can report to abort the enclosing operation.
///
/// The notifier propagates these verbatim; the only variant it originates
/// itself is `Timeout`, raised when an observer never signals completion
/// within its bound.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObserverError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Security error: {0}")]
    Security(String),

    #[error("System error: {0}")]
    System(String),

    #[error("Observer '{observer}' timed out after {waited:?}")]
    Timeout { observer: String, waited: Duration },
}
