//! The record storage trait.

use std::sync::Arc;

use appraise_core::{EntityKind, Filter};
use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;

/// Generic record storage, parameterized by entity kind.
///
/// Records are JSON objects carrying a string `id` field. The trait is
/// deliberately narrow: create, find, update, upsert, delete, each
/// scoped to one [`EntityKind`]. Implementations must be safe for
/// concurrent use from many requests at once.
///
/// The encryption interceptor ([`EncryptedStore`]) implements this same
/// trait around any backend, so business code cannot tell whether it is
/// talking to the raw store or the encrypting one.
///
/// [`EncryptedStore`]: crate::EncryptedStore
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record.
    ///
    /// The payload must be a JSON object. A missing `id` field gets a
    /// generated one; the stored record (with its id) is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPayload`] for non-object payloads,
    /// [`StoreError::Duplicate`] when the id is already taken, or a
    /// backend error.
    ///
    /// [`StoreError::InvalidPayload`]: crate::StoreError::InvalidPayload
    /// [`StoreError::Duplicate`]: crate::StoreError::Duplicate
    async fn create(&self, kind: EntityKind, payload: Value) -> StoreResult<Value>;

    /// Fetch a record by id. Returns `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the lookup fails.
    async fn find_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Value>>;

    /// Fetch the first record matching a filter. Returns `None` when
    /// nothing matches. No ordering is guaranteed between multiple
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the query fails.
    async fn find_first(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Value>>;

    /// Fetch every record matching a filter, or every record of the
    /// kind when no filter is given.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the query fails.
    async fn find_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<Vec<Value>>;

    /// Shallow-merge `changes` into an existing record and return the
    /// updated record. The `id` field cannot be changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the record does not exist
    /// or [`StoreError::InvalidPayload`] for non-object changes.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    /// [`StoreError::InvalidPayload`]: crate::StoreError::InvalidPayload
    async fn update(&self, kind: EntityKind, id: &str, changes: Value) -> StoreResult<Value>;

    /// Update the first record matching the filter, or create the
    /// payload when nothing matches.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`RecordStore::update`] and
    /// [`RecordStore::create`].
    async fn upsert(&self, kind: EntityKind, filter: &Filter, payload: Value)
    -> StoreResult<Value>;

    /// Delete a record by id and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the record does not exist.
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Value>;

    /// Delete every record matching a filter (or all records of the
    /// kind when no filter is given) and return how many were removed.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the deletion fails.
    async fn delete_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<u64>;
}

// One backend often sits behind several fronts at once, e.g. the
// encrypting store and the audit sink. Delegating through `Arc` lets
// them share it without a wrapper type.
#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn create(&self, kind: EntityKind, payload: Value) -> StoreResult<Value> {
        (**self).create(kind, payload).await
    }

    async fn find_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Value>> {
        (**self).find_by_id(kind, id).await
    }

    async fn find_first(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Value>> {
        (**self).find_first(kind, filter).await
    }

    async fn find_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<Vec<Value>> {
        (**self).find_many(kind, filter).await
    }

    async fn update(&self, kind: EntityKind, id: &str, changes: Value) -> StoreResult<Value> {
        (**self).update(kind, id, changes).await
    }

    async fn upsert(
        &self,
        kind: EntityKind,
        filter: &Filter,
        payload: Value,
    ) -> StoreResult<Value> {
        (**self).upsert(kind, filter, payload).await
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Value> {
        (**self).delete(kind, id).await
    }

    async fn delete_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<u64> {
        (**self).delete_many(kind, filter).await
    }
}
