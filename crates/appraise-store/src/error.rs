//! Storage-related error types.

use appraise_core::EntityKind;
use appraise_crypto::CryptoError;
use thiserror::Error;

/// Errors that can occur during record storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id exists.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The entity kind that was queried.
        kind: EntityKind,
        /// The id that was not found.
        id: String,
    },

    /// A record with the given id already exists.
    #[error("{kind} already exists: {id}")]
    Duplicate {
        /// The entity kind that was written.
        kind: EntityKind,
        /// The conflicting id.
        id: String,
    },

    /// The payload does not have the shape the operation requires.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A filter predicate cannot be evaluated against an encrypted
    /// field.
    #[error(
        "operator {operator:?} is not supported on encrypted field {field:?}: \
         only equality predicates work against deterministic ciphertext"
    )]
    UnsupportedFilter {
        /// The encrypted field the predicate targets.
        field: String,
        /// The rejected operator name.
        operator: &'static str,
    },

    /// Field encryption failed before the record reached the backend.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// The storage backend failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<CryptoError> for StoreError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::UnsupportedPredicate { field, operator } => {
                Self::UnsupportedFilter { field, operator }
            },
            other => Self::Encryption(other.to_string()),
        }
    }
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
