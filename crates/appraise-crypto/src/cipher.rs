//! The deterministic field cipher.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::{CryptoError, CryptoResult};
use crate::key::KeyMaterial;

/// Deterministic AES-256-GCM over individual field values.
///
/// The nonce is fixed per key, so equal plaintexts produce equal
/// ciphertexts. That is what allows equality filters to keep working
/// against encrypted columns, at the documented cost of revealing
/// which rows share a value. Ciphertext is hex-encoded so it can live
/// in ordinary string columns.
///
/// Decryption never fails: values that do not decode or do not
/// authenticate are returned unchanged. That makes reads tolerant of
/// columns that predate encryption and of fields the policy only
/// recently started covering.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
    nonce: [u8; 12],
}

impl FieldCipher {
    /// Build a cipher from derived key material.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] if the AEAD backend rejects
    /// the key. Key material derived by [`KeyMaterial`] is always the
    /// right size, so this only fires for hand-built material.
    pub fn new(material: &KeyMaterial) -> CryptoResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(material.key())
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self {
            cipher,
            nonce: *material.nonce(),
        })
    }

    /// Encrypt a field value to hex-encoded ciphertext.
    ///
    /// Deterministic: the same plaintext always yields the same
    /// ciphertext under the same key. Empty values pass through
    /// unchanged, so placeholders are never encrypted.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EncryptionFailed`] if the AEAD backend
    /// refuses the operation. Unlike decryption this is never silently
    /// passed through: a value that cannot be encrypted must not reach
    /// the store in plaintext.
    pub fn encrypt(&self, plaintext: &str) -> CryptoResult<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&self.nonce), plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;
        Ok(hex::encode(ciphertext))
    }

    /// Decrypt a stored field value.
    ///
    /// Returns the plaintext when `stored` is hex-encoded ciphertext
    /// produced under this key, and `stored` unchanged otherwise. The
    /// GCM authentication tag means a legacy plaintext value that
    /// happens to be valid hex still comes back untouched rather than
    /// as garbage.
    #[must_use]
    pub fn decrypt(&self, stored: &str) -> String {
        let Ok(bytes) = hex::decode(stored) else {
            return stored.to_string();
        };
        match self.cipher.decrypt(Nonce::from_slice(&self.nonce), bytes.as_ref()) {
            Ok(plaintext) => {
                String::from_utf8(plaintext).unwrap_or_else(|_| stored.to_string())
            },
            Err(_) => stored.to_string(),
        }
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldCipher(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        let material = KeyMaterial::from_secret("review-secret").unwrap();
        FieldCipher::new(&material).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let cipher = cipher();
        let stored = cipher.encrypt("great work this quarter").unwrap();
        assert_ne!(stored, "great work this quarter");
        assert_eq!(cipher.decrypt(&stored), "great work this quarter");
    }

    #[test]
    fn test_encryption_is_deterministic() {
        let cipher = cipher();
        assert_eq!(
            cipher.encrypt("same text").unwrap(),
            cipher.encrypt("same text").unwrap()
        );

        // A fresh cipher from the same secret agrees, so data survives
        // process restarts.
        let other = {
            let material = KeyMaterial::from_secret("review-secret").unwrap();
            FieldCipher::new(&material).unwrap()
        };
        assert_eq!(
            cipher.encrypt("same text").unwrap(),
            other.encrypt("same text").unwrap()
        );
    }

    #[test]
    fn test_different_keys_disagree() {
        let a = cipher();
        let material = KeyMaterial::from_secret("another-secret").unwrap();
        let b = FieldCipher::new(&material).unwrap();
        assert_ne!(a.encrypt("text").unwrap(), b.encrypt("text").unwrap());
    }

    #[test]
    fn test_empty_string_is_left_alone() {
        let cipher = cipher();
        assert_eq!(cipher.encrypt("").unwrap(), "");
        assert_eq!(cipher.decrypt(""), "");
    }

    #[test]
    fn test_plaintext_passes_through_decrypt() {
        let cipher = cipher();
        // Not hex at all.
        assert_eq!(cipher.decrypt("already plain"), "already plain");
        // Valid hex but not our ciphertext: the auth tag rejects it.
        assert_eq!(cipher.decrypt("deadbeef"), "deadbeef");
        assert_eq!(cipher.decrypt(""), "");
    }

    #[test]
    fn test_tampered_ciphertext_passes_through() {
        let cipher = cipher();
        let stored = cipher.encrypt("confidential").unwrap();
        let mut tampered = stored.clone();
        tampered.replace_range(0..2, if &stored[0..2] == "00" { "11" } else { "00" });
        assert_eq!(cipher.decrypt(&tampered), tampered);
    }

    #[test]
    fn test_ciphertext_is_hex() {
        let cipher = cipher();
        let stored = cipher.encrypt("value").unwrap();
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_unicode_round_trips() {
        let cipher = cipher();
        let text = "ótimo trabalho, 素晴らしい 👍";
        let stored = cipher.encrypt(text).unwrap();
        assert_eq!(cipher.decrypt(&stored), text);
    }
}
