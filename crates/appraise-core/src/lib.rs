//! Appraise Core - shared types for the review platform.
//!
//! This crate provides:
//! - The closed set of [`EntityKind`]s the platform persists
//! - The [`FieldPolicy`] table naming which fields are encrypted at rest
//! - The [`Filter`] predicate tree the store accepts
//! - Identifier newtypes ([`ActorId`], [`CorrelationId`], [`AuditEventId`])
//!
//! Everything here is deliberately passive: no I/O, no crypto, no
//! async. The encryption, storage, and audit crates all build on these
//! types, which keeps their interfaces aligned without circular
//! dependencies.
//!
//! # Example
//!
//! ```
//! use appraise_core::{EntityKind, FieldPolicy};
//!
//! let policy = FieldPolicy::standard();
//! assert!(policy.is_encrypted(EntityKind::Reference, "justification"));
//! assert!(!policy.is_encrypted(EntityKind::Cycle, "name"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod entity;
mod error;
mod filter;
mod ids;
mod policy;

pub use entity::EntityKind;
pub use error::{CoreError, CoreResult};
pub use filter::Filter;
pub use ids::{ANONYMOUS_ACTOR, ActorId, AuditEventId, CorrelationId, Timestamp};
pub use policy::{FieldPolicy, FieldRule};
