//! Prelude module - commonly used types for convenient import.
//!
//! Use `use appraise_crypto::prelude::*;` to import all essential types.

// Errors
pub use crate::{CryptoError, CryptoResult};

// Key material
pub use crate::{ENCRYPTION_SECRET_VAR, KeyMaterial};

// Cipher and codec
pub use crate::{FieldCipher, FieldCodec};
