//! Audit-related error types.
//!
//! These errors stay inside the audit pipeline. The recorder boundary
//! is fail-open: callers of [`AuditRecorder::record`] never see them.
//!
//! [`AuditRecorder::record`]: crate::AuditRecorder::record

use thiserror::Error;

/// Errors that can occur inside the audit pipeline.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The audit sink failed to persist an event.
    #[error("audit sink error: {0}")]
    Sink(String),

    /// The identity directory failed to answer a lookup.
    #[error("identity directory error: {0}")]
    Directory(String),

    /// An event could not be serialized for persistence.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for audit operations.
pub type AuditResult<T> = Result<T, AuditError>;
