//! The fail-open audit recorder.

use std::sync::Arc;

use appraise_core::AuditEventId;
use serde_json::Value;
use tracing::{debug, error};

use crate::event::{AuditDraft, AuditEvent, AuditMetadata};
use crate::resolver::ActorResolver;
use crate::sanitize::{sanitize, sanitize_map};
use crate::sink::AuditSink;

/// Turns drafts into persisted audit events.
///
/// The recorder is the fail-open boundary of the pipeline: it resolves
/// the actor, sanitizes payloads, seals the event, and appends it to
/// the sink. A sink failure is logged at error level with full context
/// and otherwise swallowed. A broken audit store must never take down
/// the operation being audited.
pub struct AuditRecorder {
    resolver: ActorResolver,
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Build a recorder from its collaborators.
    #[must_use]
    pub fn new(resolver: ActorResolver, sink: Arc<dyn AuditSink>) -> Self {
        Self { resolver, sink }
    }

    /// Resolve, sanitize, seal and persist a draft.
    ///
    /// Returns the event id when the event was persisted and `None`
    /// when the sink failed. Deliberately infallible: audit problems
    /// are an operations signal, not a caller error.
    pub async fn record(&self, draft: AuditDraft) -> Option<AuditEventId> {
        let AuditDraft {
            claimed_actor,
            action,
            resource,
            correlation_id,
            outcome,
            old_value,
            new_value,
            ip,
            user_agent,
            context,
        } = draft;

        let actor = self.resolver.resolve(claimed_actor.as_ref()).await;
        // When the claim did not resolve, the event is attributed to
        // the fallback actor and the claim itself is preserved for
        // forensics.
        let original_actor = claimed_actor.filter(|claimed| *claimed != actor);

        let mut additional_context = sanitize_map(context);
        if let Some(original) = &original_actor {
            additional_context.insert(
                "originalActorId".to_string(),
                Value::String(original.as_str().to_string()),
            );
        }

        let metadata = AuditMetadata {
            old_value: old_value.map(sanitize),
            new_value: new_value.map(sanitize),
            result: outcome,
            ip,
            user_agent,
            correlation_id,
            additional_context,
            original_actor_id: original_actor,
        };

        let event = AuditEvent::create(actor, action, resource, metadata);
        match self.sink.append(&event).await {
            Ok(()) => {
                debug!(
                    event_id = %event.id,
                    action = %event.action,
                    resource = %event.resource,
                    "audit event recorded"
                );
                Some(event.id)
            },
            Err(err) => {
                error!(
                    error = %err,
                    event_id = %event.id,
                    action = %event.action,
                    resource = %event.resource,
                    actor = %event.actor_id,
                    correlation_id = %event.metadata.correlation_id,
                    "failed to persist audit event; continuing without audit record"
                );
                None
            },
        }
    }
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder").finish_non_exhaustive()
    }
}
