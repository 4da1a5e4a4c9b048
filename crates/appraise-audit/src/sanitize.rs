//! Payload sanitization for audit metadata.
//!
//! Captured request/response payloads can contain credentials that must
//! never reach the audit store. Any key whose name contains one of the
//! sensitive markers, at any depth, has its whole value replaced by the
//! redaction marker. Matching is by substring, so `apiKey`,
//! `refresh_token` and `PASSWORD_HASH` are all caught; the occasional
//! false positive (`monkey` contains `key`) is the accepted price.

use serde_json::{Map, Value};

/// What a redacted value is replaced with.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Key-name substrings that mark a value as sensitive.
const SENSITIVE_MARKERS: [&str; 4] = ["password", "token", "secret", "key"];

/// Whether a key name marks its value as sensitive.
#[must_use]
pub fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Deep-copy a value with every sensitive entry redacted.
#[must_use]
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(sanitize_map(map)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        scalar => scalar,
    }
}

/// Sanitize a JSON object in map form.
#[must_use]
pub fn sanitize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            if is_sensitive_key(&key) {
                (key, Value::String(REDACTION_MARKER.to_string()))
            } else {
                (key, sanitize(value))
            }
        })
        .collect()
}
