//! Key material derivation and handling.
//!
//! The platform takes one external secret and derives both the AES key
//! and the fixed nonce from it with domain-separated BLAKE3, so the two
//! can never collide and rotating the secret rotates both.

use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Environment variable holding the encryption secret.
pub const ENCRYPTION_SECRET_VAR: &str = "APPRAISE_ENCRYPTION_SECRET";

/// Domain separation context for the AES-256 key.
const KEY_CONTEXT: &str = "appraise-crypto 2025-01-10 field cipher key v1";

/// Domain separation context for the deterministic nonce.
const NONCE_CONTEXT: &str = "appraise-crypto 2025-01-10 field cipher nonce v1";

/// Derived key material for the field cipher.
///
/// Holds the AES-256 key and the fixed 96-bit nonce. Both are zeroed
/// on drop. The nonce is fixed on purpose: identical plaintexts must
/// produce identical ciphertexts so equality filters keep working
/// against encrypted columns. See the crate docs for the trade-off.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: [u8; 32],
    nonce: [u8; 12],
}

impl KeyMaterial {
    /// Derive key material from an external secret.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingSecret`] when the secret is empty
    /// or whitespace-only.
    pub fn from_secret(secret: &str) -> CryptoResult<Self> {
        if secret.trim().is_empty() {
            return Err(CryptoError::MissingSecret(
                "secret material is empty".to_string(),
            ));
        }
        Ok(Self::derive(secret.as_bytes()))
    }

    /// Load key material from [`ENCRYPTION_SECRET_VAR`].
    ///
    /// Intended to run at process start: a missing secret is a fatal
    /// configuration error, not something to discover at first use.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingSecret`] when the variable is
    /// unset or empty.
    pub fn from_env() -> CryptoResult<Self> {
        Self::from_env_var(ENCRYPTION_SECRET_VAR)
    }

    /// Load key material from a named environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingSecret`] when the variable is
    /// unset or empty.
    pub fn from_env_var(var: &str) -> CryptoResult<Self> {
        match std::env::var(var) {
            Ok(secret) if !secret.trim().is_empty() => Ok(Self::derive(secret.as_bytes())),
            Ok(_) => Err(CryptoError::MissingSecret(format!(
                "environment variable {var} is set but empty"
            ))),
            Err(_) => Err(CryptoError::MissingSecret(format!(
                "environment variable {var} is not set"
            ))),
        }
    }

    /// Generate fresh random key material.
    ///
    /// Useful for tests and local tooling. Production deployments load
    /// the secret from the environment so restarts keep decrypting
    /// existing data.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        let material = Self::derive(&secret);
        secret.zeroize();
        material
    }

    fn derive(secret: &[u8]) -> Self {
        let key = blake3::derive_key(KEY_CONTEXT, secret);
        let nonce_block = blake3::derive_key(NONCE_CONTEXT, secret);
        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&nonce_block[..12]);
        Self { key, nonce }
    }

    pub(crate) fn key(&self) -> &[u8; 32] {
        &self.key
    }

    pub(crate) fn nonce(&self) -> &[u8; 12] {
        &self.nonce
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial(..)")
    }
}
