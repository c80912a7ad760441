//! Error types for the search engine core.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by [`crate::SearchEngine`] operations.
///
/// Callers can rely on the distinction: rejected input is `InvalidArgument`,
/// while "no results" is an empty `Ok` list and never an error.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Caller-supplied input was rejected before any state changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The index referenced state that no longer exists. Prevented by
    /// construction; if observed anyway, the engine fails fast instead of
    /// returning results from an inconsistent view.
    #[error("internal invariant violation: {0}")]
    InternalInvariantViolation(String),
}

impl EngineError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}
