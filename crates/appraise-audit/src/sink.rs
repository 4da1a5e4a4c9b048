//! Audit event sinks.

use std::sync::{Arc, RwLock};

use appraise_core::EntityKind;
use appraise_store::RecordStore;
use async_trait::async_trait;

use crate::error::{AuditError, AuditResult};
use crate::event::AuditEvent;

/// Persistence backend for audit events.
///
/// Append-only on purpose: nothing in the pipeline updates or deletes
/// audit events. Implementations must be safe for concurrent appends
/// from many requests at once.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one event.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Sink`] when the event could not be
    /// persisted. The recorder logs and swallows this; it never reaches
    /// request handlers.
    async fn append(&self, event: &AuditEvent) -> AuditResult<()>;
}

/// In-memory sink for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in an Arc for sharing.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Snapshot of the recorded events, in append order.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    async fn append(&self, event: &AuditEvent) -> AuditResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|_| AuditError::Sink("audit sink lock poisoned".to_string()))?;
        events.push(event.clone());
        Ok(())
    }
}

/// Sink that persists events as `AuditEvent` records in a store.
///
/// Production wiring: audit events land in the same store as business
/// data, through the same shared handle, so one connection pool serves
/// both.
pub struct StoreSink {
    store: Arc<dyn RecordStore>,
}

impl StoreSink {
    /// Build a sink over a shared store handle.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for StoreSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreSink").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuditSink for StoreSink {
    async fn append(&self, event: &AuditEvent) -> AuditResult<()> {
        let record = serde_json::to_value(event)
            .map_err(|e| AuditError::Serialization(e.to_string()))?;
        self.store
            .create(EntityKind::AuditEvent, record)
            .await
            .map_err(|e| AuditError::Sink(e.to_string()))?;
        Ok(())
    }
}
