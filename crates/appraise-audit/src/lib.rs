//! Appraise Audit - the fail-open audit trail pipeline.
//!
//! This crate provides:
//! - [`AuditEvent`] / [`AuditDraft`]: the persisted event shape and the
//!   draft assembled at the request boundary
//! - [`ActorResolver`]: maps claimed actor ids to real identities,
//!   degrading to the fallback actor instead of failing
//! - [`AuditRecorder`]: resolves, sanitizes, seals and persists drafts,
//!   swallowing sink failures
//! - [`AuditSink`] / [`IdentityDirectory`]: the persistence and lookup
//!   seams, with in-memory and store-backed implementations
//!
//! # Failure model
//!
//! Auditing observes the system; it must never change its behavior.
//! Every failure inside this crate is contained: directory errors
//! degrade to the fallback actor (logged at warning level), sink errors
//! are logged at error level and swallowed. The only thing a caller can
//! observe about a broken audit pipeline is the log stream and the
//! `None` returned by [`AuditRecorder::record`].
//!
//! # Integrity
//!
//! Events carry a BLAKE3 hash over their contents, checked by
//! [`AuditEvent::verify_integrity`]. Events are hashed independently
//! rather than chained: audit writes from concurrent requests are
//! unordered by design, so a hash chain would serialize them for no
//! forensic gain.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod directory;
mod error;
mod event;
mod recorder;
mod resolver;
mod sanitize;
mod sink;

pub use directory::{IdentityDirectory, InMemoryDirectory, StoreDirectory};
pub use error::{AuditError, AuditResult};
pub use event::{AuditAction, AuditDraft, AuditEvent, AuditMetadata, AuditOutcome};
pub use recorder::AuditRecorder;
pub use resolver::ActorResolver;
pub use sanitize::{REDACTION_MARKER, is_sensitive_key, sanitize, sanitize_map};
pub use sink::{AuditSink, MemorySink, StoreSink};
