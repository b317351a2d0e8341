//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No todo exists with the given identifier.
    #[error("todo not found: {0}")]
    NotFound(i64),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// The backing store could not be reached or rejected the operation.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
