//! Prelude module - commonly used types for convenient import.
//!
//! Use `use appraise_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Entities and policy
pub use crate::{EntityKind, FieldPolicy, FieldRule};

// Filters
pub use crate::Filter;

// Identifiers
pub use crate::{ANONYMOUS_ACTOR, ActorId, AuditEventId, CorrelationId, Timestamp};
