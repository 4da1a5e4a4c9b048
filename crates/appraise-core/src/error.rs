//! Core error types.

use thiserror::Error;

/// Errors that can occur in core type handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An entity name did not match any supported entity kind.
    #[error("unknown entity kind: {name}")]
    UnknownEntity {
        /// The name that failed to parse.
        name: String,
    },

    /// An identifier string was empty or malformed.
    #[error("invalid identifier: {reason}")]
    InvalidId {
        /// Why the identifier was rejected.
        reason: String,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
