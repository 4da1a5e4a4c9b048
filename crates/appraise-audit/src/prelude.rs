//! Prelude module - commonly used types for convenient import.
//!
//! Use `use appraise_audit::prelude::*;` to import all essential types.

// Errors
pub use crate::{AuditError, AuditResult};

// Event types
pub use crate::{AuditAction, AuditDraft, AuditEvent, AuditMetadata, AuditOutcome};

// Pipeline
pub use crate::{ActorResolver, AuditRecorder};

// Directories and sinks
pub use crate::{
    AuditSink, IdentityDirectory, InMemoryDirectory, MemorySink, StoreDirectory, StoreSink,
};

// Sanitization
pub use crate::{REDACTION_MARKER, is_sensitive_key, sanitize, sanitize_map};
