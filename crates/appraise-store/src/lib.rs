//! Appraise Store - record storage with transparent field encryption.
//!
//! This crate provides:
//! - [`RecordStore`]: the narrow create/find/update/delete interface
//!   every backend implements
//! - [`MemoryStore`]: the concurrent in-memory reference backend
//! - [`EncryptedStore`]: the interceptor that encrypts policy fields
//!   outbound and decrypts them inbound, implementing [`RecordStore`]
//!   itself so it can wrap any backend invisibly
//!
//! # Ordering
//!
//! For a single operation the interceptor always encrypts before the
//! backend call and decrypts strictly after it completes. Operations
//! from concurrent requests interleave freely; the interceptor holds no
//! mutable state, only the shared read-only codec and the backend
//! handle.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod encrypted;
mod error;
mod memory;
mod store;

pub use encrypted::{EncryptedStore, EntityHandle};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::RecordStore;
