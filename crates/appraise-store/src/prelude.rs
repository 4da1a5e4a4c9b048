//! Prelude module - commonly used types for convenient import.
//!
//! Use `use appraise_store::prelude::*;` to import all essential types.

// Errors
pub use crate::{StoreError, StoreResult};

// Storage trait and backends
pub use crate::{MemoryStore, RecordStore};

// Encryption interceptor
pub use crate::{EncryptedStore, EntityHandle};
