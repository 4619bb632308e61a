//! Core error types for the allocation engine.
//!
//! Infeasible targets and degenerate divisions are *not* errors: the engine
//! resolves them to zeroed derived values or per-item warnings (see the
//! solver and aggregation services). Errors here cover caller contract
//! violations only.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the allocation engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Unknown rebalance mode '{0}'")]
    UnknownRebalanceMode(String),
}
