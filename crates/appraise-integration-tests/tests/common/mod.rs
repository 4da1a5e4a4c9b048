//! Shared test harness for integration tests.

use std::sync::Arc;

use appraise_audit::{ActorResolver, AuditEvent, AuditRecorder, AuditSink, StoreDirectory, StoreSink};
use appraise_core::{EntityKind, FieldPolicy};
use appraise_crypto::{FieldCipher, FieldCodec, KeyMaterial};
use appraise_gateway::{GatewayConfig, RequestObserver};
use appraise_store::{EncryptedStore, MemoryStore, RecordStore};
use serde_json::json;

/// A self-contained harness wiring the production request path: an
/// encrypting store over a shared in-memory backend, a store-backed
/// actor directory and audit sink, and the request observer in front.
///
/// Everything hangs off one `MemoryStore`, so tests can assert what is
/// actually at rest (ciphertext, audit rows) next to what callers see.
#[allow(dead_code)]
pub struct GatewayHarness {
    /// The raw backend, for at-rest assertions.
    pub backend: Arc<MemoryStore>,
    /// The encrypting store handlers read and write through.
    pub store: Arc<EncryptedStore<Arc<MemoryStore>>>,
    /// The observer wrapping handlers.
    pub observer: RequestObserver,
}

#[allow(dead_code)]
impl GatewayHarness {
    /// Build a harness with the standard field policy, a fixed test
    /// secret and default gateway configuration.
    pub fn new() -> Self {
        Self::build(GatewayConfig::default(), None)
    }

    /// Build a harness whose audit events go to the given sink instead
    /// of the shared backend.
    pub fn with_sink(sink: Arc<dyn AuditSink>) -> Self {
        Self::build(GatewayConfig::default(), Some(sink))
    }

    fn build(config: GatewayConfig, sink: Option<Arc<dyn AuditSink>>) -> Self {
        let backend = Arc::new(MemoryStore::new());

        let material =
            KeyMaterial::from_secret("integration-secret").expect("secret is non-empty");
        let cipher = FieldCipher::new(&material).expect("key material is valid");
        let codec = FieldCodec::new(cipher, FieldPolicy::standard());
        let store = Arc::new(EncryptedStore::new(Arc::clone(&backend), codec));

        let directory = Arc::new(StoreDirectory::new(Arc::clone(&backend) as Arc<dyn RecordStore>));
        let resolver = ActorResolver::new(directory);
        let sink = sink.unwrap_or_else(|| {
            Arc::new(StoreSink::new(Arc::clone(&backend) as Arc<dyn RecordStore>))
        });
        let recorder = Arc::new(AuditRecorder::new(resolver, sink));
        let observer = RequestObserver::new(recorder, config);

        GatewayHarness {
            backend,
            store,
            observer,
        }
    }

    /// Seed an employee profile the actor directory can resolve.
    pub async fn seed_employee(&self, id: &str, name: &str) {
        self.backend
            .create(EntityKind::Employee, json!({ "id": id, "name": name }))
            .await
            .expect("employee seed");
    }

    /// Audit events persisted to the shared backend. Unordered; match
    /// on action or correlation id rather than position.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.backend
            .find_many(EntityKind::AuditEvent, None)
            .await
            .expect("audit listing")
            .into_iter()
            .map(|record| serde_json::from_value(record).expect("well-formed audit record"))
            .collect()
    }
}
