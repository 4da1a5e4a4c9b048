//! Appraise Crypto - transparent field-level encryption.
//!
//! This crate provides:
//! - [`KeyMaterial`]: key and nonce derivation from one external secret
//! - [`FieldCipher`]: deterministic AES-256-GCM over single field values
//! - [`FieldCodec`]: the recursive walk applying the field policy to
//!   whole payloads and to query filters
//!
//! # Security model
//!
//! Encryption is deterministic on purpose: the nonce is fixed per key,
//! so equal plaintexts yield equal ciphertexts and equality filters
//! keep working against encrypted columns. The trade-off is real and
//! deliberate: an attacker with database access can see which rows
//! share a value and can mount chosen-plaintext comparisons if they can
//! write through the application. The platform accepts this for review
//! prose (feedback, justifications, survey answers), where the threat
//! model is casual database access, not a cryptographic adversary. Do
//! not reuse this cipher for data where equality leakage matters; a
//! keyed blind index next to randomized encryption is the upgrade path.
//!
//! Decryption is total: a value that does not decode or does not
//! authenticate is returned unchanged, so reads survive columns that
//! predate the policy.
//!
//! # Example
//!
//! ```
//! use appraise_crypto::{FieldCipher, KeyMaterial};
//!
//! let material = KeyMaterial::from_secret("local-dev-secret").unwrap();
//! let cipher = FieldCipher::new(&material).unwrap();
//!
//! let stored = cipher.encrypt("exceeded expectations").unwrap();
//! assert_ne!(stored, "exceeded expectations");
//! assert_eq!(cipher.decrypt(&stored), "exceeded expectations");
//!
//! // Deterministic: repeat calls agree.
//! assert_eq!(stored, cipher.encrypt("exceeded expectations").unwrap());
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod cipher;
mod codec;
mod error;
mod key;

pub use cipher::FieldCipher;
pub use codec::FieldCodec;
pub use error::{CryptoError, CryptoResult};
pub use key::{ENCRYPTION_SECRET_VAR, KeyMaterial};
