//! Identity lookup for actor resolution.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use appraise_core::{ActorId, EntityKind};
use appraise_store::RecordStore;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AuditError, AuditResult};

/// Looks up identities by actor id.
///
/// The resolver only needs existence plus the raw profile; it never
/// interprets profile contents. Implementations must be safe for
/// concurrent use.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Fetch the identity profile for an actor id, or `None` when no
    /// such identity exists.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Directory`] when the lookup itself fails.
    /// The resolver treats lookup failures like missing identities, so
    /// a broken directory degrades to the fallback actor instead of
    /// failing requests.
    async fn find_identity(&self, id: &ActorId) -> AuditResult<Option<Value>>;
}

/// In-memory identity directory for tests and simple deployments.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    identities: RwLock<HashMap<ActorId, Value>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in an Arc for sharing.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Register an identity profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Directory`] when the directory lock is
    /// poisoned.
    pub fn insert(&self, id: ActorId, profile: Value) -> AuditResult<()> {
        let mut identities = self
            .identities
            .write()
            .map_err(|_| AuditError::Directory("identity directory lock poisoned".to_string()))?;
        identities.insert(id, profile);
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for InMemoryDirectory {
    async fn find_identity(&self, id: &ActorId) -> AuditResult<Option<Value>> {
        let identities = self
            .identities
            .read()
            .map_err(|_| AuditError::Directory("identity directory lock poisoned".to_string()))?;
        Ok(identities.get(id).cloned())
    }
}

/// Identity directory backed by the employee records in a store.
///
/// This is the production wiring: employees live in the same store as
/// everything else, and the audit pipeline shares its handle.
pub struct StoreDirectory {
    store: Arc<dyn RecordStore>,
}

impl StoreDirectory {
    /// Build a directory over a shared store handle.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for StoreDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreDirectory").finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityDirectory for StoreDirectory {
    async fn find_identity(&self, id: &ActorId) -> AuditResult<Option<Value>> {
        self.store
            .find_by_id(EntityKind::Employee, id.as_str())
            .await
            .map_err(|e| AuditError::Directory(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appraise_store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let directory = InMemoryDirectory::new();
        directory
            .insert(ActorId::new("emp-1"), json!({ "name": "Kim" }))
            .unwrap();

        let found = directory
            .find_identity(&ActorId::new("emp-1"))
            .await
            .unwrap();
        assert_eq!(found.unwrap()["name"], "Kim");

        let missing = directory
            .find_identity(&ActorId::new("emp-9"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_store_directory_reads_employees() {
        let store = Arc::new(MemoryStore::new());
        store
            .create(
                EntityKind::Employee,
                json!({ "id": "emp-1", "name": "Kim" }),
            )
            .await
            .unwrap();

        let directory = StoreDirectory::new(store);
        let found = directory
            .find_identity(&ActorId::new("emp-1"))
            .await
            .unwrap();
        assert_eq!(found.unwrap()["name"], "Kim");

        assert!(
            directory
                .find_identity(&ActorId::new("emp-2"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
