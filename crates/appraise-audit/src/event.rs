//! Audit event types.
//!
//! An [`AuditEvent`] is the persisted record of one security-relevant
//! operation. Events carry a BLAKE3 integrity hash over their contents
//! so tampering with a stored event is detectable. Events are
//! independent of each other: audit writes from concurrent requests
//! are unordered, so there is no cross-event chaining.

use appraise_core::{ActorId, AuditEventId, CorrelationId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The action category of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// A record was created.
    Create,
    /// A record or listing was read.
    Read,
    /// A record was updated.
    Update,
    /// A record was deleted.
    Delete,
    /// An actor signed in.
    Login,
    /// An actor signed out.
    Logout,
    /// An actor was refused access.
    AccessDenied,
}

impl AuditAction {
    /// The persisted name of the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::AccessDenied => "ACCESS_DENIED",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the audited operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditOutcome {
    /// The operation completed normally.
    Success,
    /// The operation returned an error to the caller.
    Failure,
    /// The operation did not complete, e.g. it was cancelled.
    Error,
}

impl AuditOutcome {
    /// The persisted name of the outcome.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request context attached to an audit event.
///
/// Serialized in camelCase because audit records are read by the same
/// tooling that reads the HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    /// The record state before a mutation, when known.
    #[serde(default)]
    pub old_value: Option<Value>,
    /// The record state (or response payload) after the operation.
    #[serde(default)]
    pub new_value: Option<Value>,
    /// How the operation ended.
    pub result: AuditOutcome,
    /// Client IP address, when known.
    #[serde(default)]
    pub ip: Option<String>,
    /// Client user agent, when known.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// The correlation id threading this request.
    pub correlation_id: CorrelationId,
    /// Free-form context: route, duration, error messages.
    #[serde(default)]
    pub additional_context: Map<String, Value>,
    /// The claimed actor id, preserved when the resolver substituted
    /// the fallback identity.
    #[serde(default)]
    pub original_actor_id: Option<ActorId>,
}

/// A persisted audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Unique event identifier.
    pub id: AuditEventId,
    /// The actor the event is attributed to. Always a resolvable
    /// identity or the fallback actor, never an unverified claim.
    pub actor_id: ActorId,
    /// What category of operation happened.
    pub action: AuditAction,
    /// What the operation touched, e.g. `Reference:ref-42`.
    pub resource: String,
    /// When the event was recorded.
    pub timestamp: Timestamp,
    /// Request context.
    pub metadata: AuditMetadata,
    /// Hex BLAKE3 hash over the event contents.
    pub integrity: String,
}

impl AuditEvent {
    /// Create a sealed audit event.
    #[must_use]
    pub fn create(
        actor_id: ActorId,
        action: AuditAction,
        resource: String,
        metadata: AuditMetadata,
    ) -> Self {
        let mut event = Self {
            id: AuditEventId::new(),
            actor_id,
            action,
            resource,
            timestamp: Timestamp::now(),
            metadata,
            integrity: String::new(),
        };
        event.integrity = event.compute_integrity();
        event
    }

    /// The bytes covered by the integrity hash.
    #[must_use]
    pub fn integrity_input(&self) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(self.id.0.as_bytes());
        data.extend_from_slice(&self.timestamp.0.timestamp_millis().to_le_bytes());
        data.extend_from_slice(self.actor_id.as_str().as_bytes());
        data.extend_from_slice(self.action.as_str().as_bytes());
        data.extend_from_slice(self.resource.as_bytes());
        // Metadata is serialized to JSON for consistent hashing.
        if let Ok(metadata_json) = serde_json::to_vec(&self.metadata) {
            data.extend_from_slice(&metadata_json);
        }
        data
    }

    /// Recompute the integrity hash from the current contents.
    #[must_use]
    pub fn compute_integrity(&self) -> String {
        hex::encode(blake3::hash(&self.integrity_input()).as_bytes())
    }

    /// Whether the stored integrity hash matches the event contents.
    #[must_use]
    pub fn verify_integrity(&self) -> bool {
        self.integrity == self.compute_integrity()
    }
}

/// A not-yet-persisted audit event, as assembled at the request
/// boundary.
///
/// The draft carries the *claimed* actor; the recorder resolves it to
/// a real identity (or the fallback) and sanitizes the payloads before
/// sealing the event.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    /// The actor id the request claimed, if any.
    pub claimed_actor: Option<ActorId>,
    /// What category of operation happened.
    pub action: AuditAction,
    /// What the operation touched.
    pub resource: String,
    /// The correlation id threading this request.
    pub correlation_id: CorrelationId,
    /// How the operation ended.
    pub outcome: AuditOutcome,
    /// The record state before a mutation, when known.
    pub old_value: Option<Value>,
    /// The record state (or response payload) after the operation.
    pub new_value: Option<Value>,
    /// Client IP address, when known.
    pub ip: Option<String>,
    /// Client user agent, when known.
    pub user_agent: Option<String>,
    /// Free-form context: route, duration, error messages.
    pub context: Map<String, Value>,
}

impl AuditDraft {
    /// Start a draft for an action on a resource.
    #[must_use]
    pub fn new(action: AuditAction, resource: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            claimed_actor: None,
            action,
            resource: resource.into(),
            correlation_id,
            outcome: AuditOutcome::Success,
            old_value: None,
            new_value: None,
            ip: None,
            user_agent: None,
            context: Map::new(),
        }
    }

    /// Attach the claimed actor.
    #[must_use]
    pub fn claimed_by(mut self, actor: ActorId) -> Self {
        self.claimed_actor = Some(actor);
        self
    }

    /// Set the outcome.
    #[must_use]
    pub fn outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Attach the pre-mutation record state.
    #[must_use]
    pub fn old_value(mut self, value: Value) -> Self {
        self.old_value = Some(value);
        self
    }

    /// Attach the post-operation record state or response payload.
    #[must_use]
    pub fn new_value(mut self, value: Value) -> Self {
        self.new_value = Some(value);
        self
    }

    /// Attach the client IP.
    #[must_use]
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Attach the client user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Add one key of additional context.
    #[must_use]
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(correlation: &str) -> AuditMetadata {
        AuditMetadata {
            old_value: None,
            new_value: Some(json!({ "id": "ref-1" })),
            result: AuditOutcome::Success,
            ip: Some("10.0.0.9".to_string()),
            user_agent: Some("review-web/4.1".to_string()),
            correlation_id: CorrelationId::from_header(correlation).unwrap(),
            additional_context: Map::new(),
            original_actor_id: None,
        }
    }

    #[test]
    fn test_action_names() {
        assert_eq!(AuditAction::Create.as_str(), "CREATE");
        assert_eq!(AuditAction::AccessDenied.as_str(), "ACCESS_DENIED");
        assert_eq!(
            serde_json::to_value(AuditAction::AccessDenied).unwrap(),
            "ACCESS_DENIED"
        );
    }

    #[test]
    fn test_integrity_round_trip() {
        let event = AuditEvent::create(
            ActorId::new("emp-1"),
            AuditAction::Read,
            "Reference:ref-1".to_string(),
            metadata("abc-123"),
        );
        assert!(event.verify_integrity());
    }

    #[test]
    fn test_tampering_breaks_integrity() {
        let mut event = AuditEvent::create(
            ActorId::new("emp-1"),
            AuditAction::Read,
            "Reference:ref-1".to_string(),
            metadata("abc-123"),
        );
        assert!(event.verify_integrity());

        event.actor_id = ActorId::new("someone-else");
        assert!(!event.verify_integrity());
    }

    #[test]
    fn test_persisted_shape_is_camel_case() {
        let event = AuditEvent::create(
            ActorId::new("emp-1"),
            AuditAction::Update,
            "Goal:g-1".to_string(),
            metadata("abc-123"),
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["actorId"], "emp-1");
        assert_eq!(value["action"], "UPDATE");
        assert_eq!(value["metadata"]["result"], "SUCCESS");
        assert_eq!(value["metadata"]["correlationId"], "abc-123");
        assert_eq!(value["metadata"]["userAgent"], "review-web/4.1");
        assert!(value["metadata"]["additionalContext"].is_object());
    }

    #[test]
    fn test_draft_builder() {
        let draft = AuditDraft::new(
            AuditAction::Delete,
            "Goal:g-1",
            CorrelationId::from_header("abc").unwrap(),
        )
        .claimed_by(ActorId::new("emp-2"))
        .outcome(AuditOutcome::Failure)
        .context("error", "not found");

        assert_eq!(draft.claimed_actor, Some(ActorId::new("emp-2")));
        assert_eq!(draft.outcome, AuditOutcome::Failure);
        assert_eq!(draft.context["error"], "not found");
    }
}
