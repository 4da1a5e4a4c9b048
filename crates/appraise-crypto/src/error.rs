//! Crypto-related error types.

use thiserror::Error;

/// Errors that can occur during field encryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The external encryption secret is absent or empty.
    ///
    /// This is a fatal configuration error: the process must refuse to
    /// serve traffic rather than silently store plaintext.
    #[error("encryption secret missing: {0}")]
    MissingSecret(String),

    /// Key material could not be turned into a cipher.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// The AEAD backend refused to encrypt.
    ///
    /// With key material validated at construction this does not occur
    /// in practice, but the failure must surface rather than let a
    /// plaintext value reach the store.
    #[error("field encryption failed")]
    EncryptionFailed,

    /// A filter predicate cannot be evaluated against ciphertext.
    ///
    /// Deterministic encryption preserves equality and nothing else, so
    /// substring and range predicates on encrypted fields are rejected
    /// instead of silently matching nothing.
    #[error(
        "operator {operator:?} is not supported on encrypted field {field:?}: \
         only equality predicates work against deterministic ciphertext"
    )]
    UnsupportedPredicate {
        /// The encrypted field the predicate targets.
        field: String,
        /// The rejected operator name.
        operator: &'static str,
    },
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
