//! In-memory record store.

use appraise_core::{EntityKind, Filter};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct RecordKey {
    kind: EntityKind,
    id: String,
}

/// A concurrent in-memory [`RecordStore`].
///
/// The reference backend: tests and local development run against it,
/// and the audit sink can share one instance with business data. Writes
/// are per-record atomic; `upsert` is find-then-write and does not
/// guard against a concurrent insert of the same filter match.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<RecordKey, Value>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching_keys(&self, kind: EntityKind, filter: Option<&Filter>) -> Vec<RecordKey> {
        self.records
            .iter()
            .filter(|entry| {
                entry.key().kind == kind
                    && filter.is_none_or(|f| f.matches(entry.value()))
            })
            .map(|entry| entry.key().clone())
            .collect()
    }
}

/// Extract the string `id` of a payload, if present.
fn payload_id(payload: &Value) -> Option<String> {
    payload.get("id").and_then(Value::as_str).map(str::to_string)
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, kind: EntityKind, payload: Value) -> StoreResult<Value> {
        let Value::Object(mut map) = payload else {
            return Err(StoreError::InvalidPayload(
                "create payload must be an object".to_string(),
            ));
        };

        let id = match map.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                map.insert("id".to_string(), Value::String(id.clone()));
                id
            },
        };

        let key = RecordKey {
            kind,
            id: id.clone(),
        };
        let record = Value::Object(map);
        match self.records.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(StoreError::Duplicate { kind, id }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            },
        }
    }

    async fn find_by_id(&self, kind: EntityKind, id: &str) -> StoreResult<Option<Value>> {
        let key = RecordKey {
            kind,
            id: id.to_string(),
        };
        Ok(self.records.get(&key).map(|entry| entry.value().clone()))
    }

    async fn find_first(&self, kind: EntityKind, filter: &Filter) -> StoreResult<Option<Value>> {
        Ok(self
            .records
            .iter()
            .find(|entry| entry.key().kind == kind && filter.matches(entry.value()))
            .map(|entry| entry.value().clone()))
    }

    async fn find_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<Vec<Value>> {
        let mut results: Vec<Value> = self
            .records
            .iter()
            .filter(|entry| {
                entry.key().kind == kind
                    && filter.is_none_or(|f| f.matches(entry.value()))
            })
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; sort by id so listings
        // are stable.
        results.sort_by(|a, b| {
            let a_id = a.get("id").and_then(Value::as_str).unwrap_or_default();
            let b_id = b.get("id").and_then(Value::as_str).unwrap_or_default();
            a_id.cmp(b_id)
        });
        Ok(results)
    }

    async fn update(&self, kind: EntityKind, id: &str, changes: Value) -> StoreResult<Value> {
        let Value::Object(changes) = changes else {
            return Err(StoreError::InvalidPayload(
                "update changes must be an object".to_string(),
            ));
        };

        let key = RecordKey {
            kind,
            id: id.to_string(),
        };
        let Some(mut entry) = self.records.get_mut(&key) else {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        };

        if let Value::Object(existing) = entry.value_mut() {
            for (field, value) in changes {
                if field != "id" {
                    existing.insert(field, value);
                }
            }
        }
        Ok(entry.value().clone())
    }

    async fn upsert(
        &self,
        kind: EntityKind,
        filter: &Filter,
        payload: Value,
    ) -> StoreResult<Value> {
        match self.find_first(kind, filter).await? {
            Some(existing) => {
                let id = payload_id(&existing).ok_or_else(|| {
                    StoreError::InvalidPayload("stored record is missing its id".to_string())
                })?;
                self.update(kind, &id, payload).await
            },
            None => self.create(kind, payload).await,
        }
    }

    async fn delete(&self, kind: EntityKind, id: &str) -> StoreResult<Value> {
        let key = RecordKey {
            kind,
            id: id.to_string(),
        };
        match self.records.remove(&key) {
            Some((_, record)) => Ok(record),
            None => Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            }),
        }
    }

    async fn delete_many(&self, kind: EntityKind, filter: Option<&Filter>) -> StoreResult<u64> {
        let keys = self.matching_keys(kind, filter);
        let mut removed: u64 = 0;
        for key in keys {
            if self.records.remove(&key).is_some() {
                removed = removed.saturating_add(1);
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_id_when_missing() {
        let store = MemoryStore::new();
        let record = store
            .create(EntityKind::Cycle, json!({ "name": "H1 2026" }))
            .await
            .unwrap();
        assert!(record.get("id").and_then(Value::as_str).is_some());
    }

    #[tokio::test]
    async fn test_create_keeps_provided_id() {
        let store = MemoryStore::new();
        let record = store
            .create(EntityKind::Cycle, json!({ "id": "cycle-1", "name": "H1" }))
            .await
            .unwrap();
        assert_eq!(record["id"], "cycle-1");

        let err = store
            .create(EntityKind::Cycle, json!({ "id": "cycle-1" }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_non_object_payload_is_rejected() {
        let store = MemoryStore::new();
        let err = store
            .create(EntityKind::Cycle, json!("just a string"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPayload(_)));
    }

    #[tokio::test]
    async fn test_kinds_are_isolated() {
        let store = MemoryStore::new();
        store
            .create(EntityKind::Cycle, json!({ "id": "x" }))
            .await
            .unwrap();

        assert!(
            store
                .find_by_id(EntityKind::Goal, "x")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_first_and_many() {
        let store = MemoryStore::new();
        for (id, rating) in [("e1", 3), ("e2", 4), ("e3", 4)] {
            store
                .create(EntityKind::Evaluation, json!({ "id": id, "rating": rating }))
                .await
                .unwrap();
        }

        let found = store
            .find_first(EntityKind::Evaluation, &Filter::eq("rating", 3))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["id"], "e1");

        let many = store
            .find_many(EntityKind::Evaluation, Some(&Filter::eq("rating", 4)))
            .await
            .unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many[0]["id"], "e2");
        assert_eq!(many[1]["id"], "e3");

        let all = store.find_many(EntityKind::Evaluation, None).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_merges_and_protects_id() {
        let store = MemoryStore::new();
        store
            .create(
                EntityKind::Goal,
                json!({ "id": "g1", "title": "ship", "progress": 10 }),
            )
            .await
            .unwrap();

        let updated = store
            .update(
                EntityKind::Goal,
                "g1",
                json!({ "progress": 60, "id": "hijacked" }),
            )
            .await
            .unwrap();
        assert_eq!(updated["id"], "g1");
        assert_eq!(updated["progress"], 60);
        assert_eq!(updated["title"], "ship");

        let err = store
            .update(EntityKind::Goal, "missing", json!({ "progress": 1 }))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let store = MemoryStore::new();
        let filter = Filter::eq("employeeId", "emp-1");

        let created = store
            .upsert(
                EntityKind::Goal,
                &filter,
                json!({ "employeeId": "emp-1", "title": "mentor" }),
            )
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        let updated = store
            .upsert(
                EntityKind::Goal,
                &filter,
                json!({ "employeeId": "emp-1", "title": "mentor two peers" }),
            )
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(created["id"], updated["id"]);
        assert_eq!(updated["title"], "mentor two peers");
    }

    #[tokio::test]
    async fn test_delete_returns_record() {
        let store = MemoryStore::new();
        store
            .create(EntityKind::Survey, json!({ "id": "s1", "topic": "peers" }))
            .await
            .unwrap();

        let removed = store.delete(EntityKind::Survey, "s1").await.unwrap();
        assert_eq!(removed["topic"], "peers");
        assert!(store.is_empty());

        let err = store.delete(EntityKind::Survey, "s1").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_many_counts() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store
                .create(EntityKind::Score, json!({ "id": id, "value": 4 }))
                .await
                .unwrap();
        }
        store
            .create(EntityKind::Score, json!({ "id": "d", "value": 2 }))
            .await
            .unwrap();

        let removed = store
            .delete_many(EntityKind::Score, Some(&Filter::eq("value", 4)))
            .await
            .unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.len(), 1);
    }
}
