//! Recursive encryption over nested payloads and filters.
//!
//! The codec walks a JSON value as the sum type {scalar, list, map}.
//! Map keys named by the entity's [`FieldRule`] get their string values
//! run through the [`FieldCipher`]; keys declared as nested entities
//! switch the walk to the child kind's rule; everything else recurses
//! under the same kind. Only strings are ever encrypted: numbers,
//! booleans and nulls pass through even under a policy field, matching
//! how the columns are typed.

use appraise_core::{EntityKind, FieldPolicy, Filter};
use serde_json::{Map, Value};

use crate::cipher::FieldCipher;
use crate::error::{CryptoError, CryptoResult};

/// Applies the field policy to whole payloads and filters.
#[derive(Debug, Clone)]
pub struct FieldCodec {
    cipher: FieldCipher,
    policy: FieldPolicy,
}

impl FieldCodec {
    /// Build a codec from a cipher and a field policy.
    #[must_use]
    pub fn new(cipher: FieldCipher, policy: FieldPolicy) -> Self {
        Self { cipher, policy }
    }

    /// The policy this codec applies.
    #[must_use]
    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    /// Encrypt every policy field in a payload, at any depth.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EncryptionFailed`] if the cipher refuses
    /// a value. Nothing is written anywhere on error.
    pub fn encrypt_deep(&self, value: Value, kind: EntityKind) -> CryptoResult<Value> {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, val) in map {
                    let transformed = if self.policy.is_encrypted(kind, &key) {
                        self.encrypt_field(val)?
                    } else if let Some(child) = self.policy.nested_kind(kind, &key) {
                        self.encrypt_deep(val, child)?
                    } else if matches!(val, Value::Object(_) | Value::Array(_)) {
                        self.encrypt_deep(val, kind)?
                    } else {
                        val
                    };
                    out.insert(key, transformed);
                }
                Ok(Value::Object(out))
            },
            Value::Array(items) => Ok(Value::Array(
                items
                    .into_iter()
                    .map(|item| self.encrypt_deep(item, kind))
                    .collect::<CryptoResult<Vec<_>>>()?,
            )),
            scalar => Ok(scalar),
        }
    }

    /// Decrypt every policy field in a payload, at any depth.
    ///
    /// Total: values that were never encrypted come back unchanged, so
    /// mixed plaintext/ciphertext data reads cleanly during a policy
    /// rollout.
    #[must_use]
    pub fn decrypt_deep(&self, value: Value, kind: EntityKind) -> Value {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, val) in map {
                    let transformed = if self.policy.is_encrypted(kind, &key) {
                        self.decrypt_field(val)
                    } else if let Some(child) = self.policy.nested_kind(kind, &key) {
                        self.decrypt_deep(val, child)
                    } else if matches!(val, Value::Object(_) | Value::Array(_)) {
                        self.decrypt_deep(val, kind)
                    } else {
                        val
                    };
                    out.insert(key, transformed);
                }
                Value::Object(out)
            },
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.decrypt_deep(item, kind))
                    .collect(),
            ),
            scalar => scalar,
        }
    }

    /// Rewrite a filter so it matches encrypted columns.
    ///
    /// Equality and membership predicates on encrypted fields have
    /// their comparison values encrypted, which works because the
    /// cipher is deterministic. Substring and range predicates on
    /// encrypted fields cannot work against ciphertext and are
    /// rejected. Predicates on plain fields pass through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedPredicate`] for a substring or
    /// range predicate on an encrypted field, and
    /// [`CryptoError::EncryptionFailed`] if encrypting a comparison
    /// value fails.
    pub fn encrypt_filter(&self, filter: Filter, kind: EntityKind) -> CryptoResult<Filter> {
        match filter {
            Filter::And(filters) => Ok(Filter::And(
                filters
                    .into_iter()
                    .map(|f| self.encrypt_filter(f, kind))
                    .collect::<CryptoResult<Vec<_>>>()?,
            )),
            Filter::Or(filters) => Ok(Filter::Or(
                filters
                    .into_iter()
                    .map(|f| self.encrypt_filter(f, kind))
                    .collect::<CryptoResult<Vec<_>>>()?,
            )),
            Filter::Not(inner) => Ok(Filter::Not(Box::new(self.encrypt_filter(*inner, kind)?))),
            Filter::Eq { field, value } => {
                let value = if self.policy.is_encrypted(kind, &field) {
                    self.encrypt_comparison(value)?
                } else {
                    value
                };
                Ok(Filter::Eq { field, value })
            },
            Filter::In { field, values } => {
                let values = if self.policy.is_encrypted(kind, &field) {
                    values
                        .into_iter()
                        .map(|v| self.encrypt_comparison(v))
                        .collect::<CryptoResult<Vec<_>>>()?
                } else {
                    values
                };
                Ok(Filter::In { field, values })
            },
            other => {
                if let Some(field) = other.target_field() {
                    if self.policy.is_encrypted(kind, field) {
                        return Err(CryptoError::UnsupportedPredicate {
                            field: field.to_string(),
                            operator: other.operator(),
                        });
                    }
                }
                Ok(other)
            },
        }
    }

    /// Encrypt the value under a policy field: strings are encrypted,
    /// lists map the operation over their elements, everything else
    /// passes through.
    fn encrypt_field(&self, value: Value) -> CryptoResult<Value> {
        match value {
            Value::String(s) => Ok(Value::String(self.cipher.encrypt(&s)?)),
            Value::Array(items) => Ok(Value::Array(
                items
                    .into_iter()
                    .map(|item| self.encrypt_field(item))
                    .collect::<CryptoResult<Vec<_>>>()?,
            )),
            other => Ok(other),
        }
    }

    fn decrypt_field(&self, value: Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.cipher.decrypt(&s)),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.decrypt_field(item))
                    .collect(),
            ),
            other => other,
        }
    }

    fn encrypt_comparison(&self, value: Value) -> CryptoResult<Value> {
        match value {
            Value::String(s) => Ok(Value::String(self.cipher.encrypt(&s)?)),
            other => Ok(other),
        }
    }
}
