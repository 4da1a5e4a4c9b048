//! The transparent encryption interceptor.

use appraise_core::{EntityKind, Filter};
use appraise_crypto::FieldCodec;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;
use crate::store::RecordStore;

/// A [`RecordStore`] that encrypts policy fields on the way in and
/// decrypts them on the way out.
///
/// The interceptor is constructed once with its dependencies (codec and
/// backend) and shared by handle; there is no global registry to attach
/// to. Business code sees plaintext on both sides of every operation:
/// payloads and filters are rewritten before the backend call, results
/// are decrypted strictly after it completes.
///
/// Callers that work with one entity kind can take an [`EntityHandle`]
/// via [`EncryptedStore::entity`] instead of passing the kind to every
/// call.
#[derive(Debug)]
pub struct EncryptedStore<S> {
    inner: S,
    codec: FieldCodec,
}

impl<S: RecordStore> EncryptedStore<S> {
    /// Wrap a backend with the given codec.
    #[must_use]
    pub fn new(inner: S, codec: FieldCodec) -> Self {
        Self { inner, codec }
    }

    /// The wrapped backend. Reads through this handle see ciphertext.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The codec this interceptor applies.
    #[must_use]
    pub fn codec(&self) -> &FieldCodec {
        &self.codec
    }

    /// A handle scoped to one entity kind.
    #[must_use]
    pub fn entity(&self, kind: EntityKind) -> EntityHandle<'_, S> {
        EntityHandle { store: self, kind }
    }

    fn encrypt_filter_opt(
        &self,
        kind: EntityKind,
        filter: Option<&Filter>,
    ) -> StoreResult<Option<Filter>> {
        filter
            .map(|f| self.codec.encrypt_filter(f.clone(), kind))
            .transpose()
            .map_err(Into::into)
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for EncryptedStore<S> {
    async fn create(&self, kind: EntityKind, payload: Value) -> StoreResult<Value> {
        let stored = self.codec.encrypt_deep(payload, kind)?;
        let created = self.inner.create(kind, stored).await?;
        Ok(self.codec.decrypt_deep(created, kind))
    }

    async fn find_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Value>> {
        let found = self.inner.find_by_id(kind, id).await?;
        Ok(found.map(|record| self.codec.decrypt_deep(record, kind)))
    }

    async fn find_first(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Value>> {
        let rewritten = self.codec.encrypt_filter(filter.clone(), kind)?;
        let found = self.inner.find_first(kind, &rewritten).await?;
        Ok(found.map(|record| self.codec.decrypt_deep(record, kind)))
    }

    async fn find_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<Vec<Value>> {
        let rewritten = self.encrypt_filter_opt(kind, filter)?;
        let found = self.inner.find_many(kind, rewritten.as_ref()).await?;
        Ok(found
            .into_iter()
            .map(|record| self.codec.decrypt_deep(record, kind))
            .collect())
    }

    async fn update(&self, kind: EntityKind, id: &str, changes: Value) -> StoreResult<Value> {
        let stored = self.codec.encrypt_deep(changes, kind)?;
        let updated = self.inner.update(kind, id, stored).await?;
        Ok(self.codec.decrypt_deep(updated, kind))
    }

    async fn upsert(
        &self,
        kind: EntityKind,
        filter: &Filter,
        payload: Value,
    ) -> StoreResult<Value> {
        let rewritten = self.codec.encrypt_filter(filter.clone(), kind)?;
        let stored = self.codec.encrypt_deep(payload, kind)?;
        let written = self.inner.upsert(kind, &rewritten, stored).await?;
        Ok(self.codec.decrypt_deep(written, kind))
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Value> {
        let removed = self.inner.delete(kind, id).await?;
        Ok(self.codec.decrypt_deep(removed, kind))
    }

    async fn delete_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<u64> {
        let rewritten = self.encrypt_filter_opt(kind, filter)?;
        self.inner.delete_many(kind, rewritten.as_ref()).await
    }
}

/// An [`EncryptedStore`] scoped to one entity kind.
///
/// This is the surface business services use: ask the store for
/// `entity(EntityKind::Reference)` once and call it like a typed
/// repository.
#[derive(Debug, Clone, Copy)]
pub struct EntityHandle<'a, S> {
    store: &'a EncryptedStore<S>,
    kind: EntityKind,
}

impl<S: RecordStore> EntityHandle<'_, S> {
    /// The entity kind this handle is scoped to.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Create a record. See [`RecordStore::create`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn create(&self, payload: Value) -> StoreResult<Value> {
        self.store.create(self.kind, payload).await
    }

    /// Fetch a record by id. See [`RecordStore::find_by_id`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Value>> {
        self.store.find_by_id(self.kind, id).await
    }

    /// Fetch the first match. See [`RecordStore::find_first`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn find_first(&self, filter: &Filter) -> StoreResult<Option<Value>> {
        self.store.find_first(self.kind, filter).await
    }

    /// Fetch all matches. See [`RecordStore::find_many`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn find_many(&self, filter: Option<&Filter>) -> StoreResult<Vec<Value>> {
        self.store.find_many(self.kind, filter).await
    }

    /// Update a record. See [`RecordStore::update`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn update(&self, id: &str, changes: Value) -> StoreResult<Value> {
        self.store.update(self.kind, id, changes).await
    }

    /// Update-or-create. See [`RecordStore::upsert`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn upsert(&self, filter: &Filter, payload: Value) -> StoreResult<Value> {
        self.store.upsert(self.kind, filter, payload).await
    }

    /// Delete a record by id. See [`RecordStore::delete`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn delete(&self, id: &str) -> StoreResult<Value> {
        self.store.delete(self.kind, id).await
    }

    /// Delete all matches. See [`RecordStore::delete_many`].
    ///
    /// # Errors
    ///
    /// Propagates the wrapped store's errors.
    pub async fn delete_many(&self, filter: Option<&Filter>) -> StoreResult<u64> {
        self.store.delete_many(self.kind, filter).await
    }
}
