//! The field policy: which fields of which entity kinds are encrypted
//! at rest, and which fields hold nested child entities.
//!
//! The policy is a static table built once at startup and shared
//! read-only afterwards. Lookups for kinds without a rule return the
//! empty rule, so an unconfigured entity is stored untouched rather
//! than rejected.

use std::collections::{BTreeSet, HashMap};

use crate::entity::EntityKind;

/// Per-entity-kind encryption rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldRule {
    encrypted: BTreeSet<String>,
    nested: HashMap<String, EntityKind>,
}

impl FieldRule {
    /// An empty rule: nothing encrypted, no nested entities.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a field as encrypted at rest.
    #[must_use]
    pub fn encrypt(mut self, field: impl Into<String>) -> Self {
        self.encrypted.insert(field.into());
        self
    }

    /// Declare that a field holds child entities of another kind.
    ///
    /// When the codec descends into this field it switches to the child
    /// kind's rule, so `Evaluation.scores[*].justification` is encrypted
    /// by the `Score` rule even though it sits inside an evaluation
    /// payload.
    #[must_use]
    pub fn nest(mut self, field: impl Into<String>, kind: EntityKind) -> Self {
        self.nested.insert(field.into(), kind);
        self
    }

    /// Whether `field` is encrypted under this rule.
    #[must_use]
    pub fn is_encrypted(&self, field: &str) -> bool {
        self.encrypted.contains(field)
    }

    /// The child entity kind stored under `field`, if any.
    #[must_use]
    pub fn nested_kind(&self, field: &str) -> Option<EntityKind> {
        self.nested.get(field).copied()
    }

    /// The encrypted field names, in sorted order.
    pub fn encrypted_fields(&self) -> impl Iterator<Item = &str> {
        self.encrypted.iter().map(String::as_str)
    }

    /// Whether this rule encrypts nothing and nests nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encrypted.is_empty() && self.nested.is_empty()
    }
}

/// The full per-entity encryption policy.
#[derive(Debug, Clone, Default)]
pub struct FieldPolicy {
    rules: HashMap<EntityKind, FieldRule>,
    empty: FieldRule,
}

impl FieldPolicy {
    /// An empty policy: no entity has encrypted fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for an entity kind.
    #[must_use]
    pub fn with_rule(mut self, kind: EntityKind, rule: FieldRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    /// The production policy for the review platform.
    ///
    /// Free-text fields that may contain personal judgments are
    /// encrypted; structural fields (ids, dates, numeric ratings,
    /// foreign keys) are not, so they stay filterable and sortable.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_rule(
                EntityKind::Evaluation,
                FieldRule::new()
                    .encrypt("feedback")
                    .nest("scores", EntityKind::Score),
            )
            .with_rule(EntityKind::Score, FieldRule::new().encrypt("justification"))
            .with_rule(EntityKind::Goal, FieldRule::new().encrypt("description"))
            .with_rule(
                EntityKind::Survey,
                FieldRule::new().nest("answers", EntityKind::SurveyAnswer),
            )
            .with_rule(
                EntityKind::SurveyAnswer,
                FieldRule::new().encrypt("answer"),
            )
            .with_rule(
                EntityKind::Insight,
                FieldRule::new().encrypt("content").encrypt("summary"),
            )
            .with_rule(
                EntityKind::Reference,
                FieldRule::new().encrypt("justification"),
            )
    }

    /// The rule for an entity kind.
    ///
    /// Kinds without a configured rule get the empty rule.
    #[must_use]
    pub fn rule(&self, kind: EntityKind) -> &FieldRule {
        self.rules.get(&kind).unwrap_or(&self.empty)
    }

    /// Whether `field` of `kind` is encrypted at rest.
    #[must_use]
    pub fn is_encrypted(&self, kind: EntityKind, field: &str) -> bool {
        self.rule(kind).is_encrypted(field)
    }

    /// The child entity kind stored under `field` of `kind`, if any.
    #[must_use]
    pub fn nested_kind(&self, kind: EntityKind, field: &str) -> Option<EntityKind> {
        self.rule(kind).nested_kind(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_encrypts_free_text() {
        let policy = FieldPolicy::standard();

        assert!(policy.is_encrypted(EntityKind::Evaluation, "feedback"));
        assert!(policy.is_encrypted(EntityKind::Score, "justification"));
        assert!(policy.is_encrypted(EntityKind::Goal, "description"));
        assert!(policy.is_encrypted(EntityKind::SurveyAnswer, "answer"));
        assert!(policy.is_encrypted(EntityKind::Insight, "content"));
        assert!(policy.is_encrypted(EntityKind::Insight, "summary"));
        assert!(policy.is_encrypted(EntityKind::Reference, "justification"));
    }

    #[test]
    fn test_structural_fields_stay_plain() {
        let policy = FieldPolicy::standard();

        assert!(!policy.is_encrypted(EntityKind::Evaluation, "id"));
        assert!(!policy.is_encrypted(EntityKind::Evaluation, "rating"));
        assert!(!policy.is_encrypted(EntityKind::Score, "value"));
        assert!(!policy.is_encrypted(EntityKind::Cycle, "name"));
    }

    #[test]
    fn test_unconfigured_kind_gets_empty_rule() {
        let policy = FieldPolicy::standard();

        assert!(policy.rule(EntityKind::Employee).is_empty());
        assert!(!policy.is_encrypted(EntityKind::AuditEvent, "resource"));
    }

    #[test]
    fn test_nested_kinds() {
        let policy = FieldPolicy::standard();

        assert_eq!(
            policy.nested_kind(EntityKind::Evaluation, "scores"),
            Some(EntityKind::Score)
        );
        assert_eq!(
            policy.nested_kind(EntityKind::Survey, "answers"),
            Some(EntityKind::SurveyAnswer)
        );
        assert_eq!(policy.nested_kind(EntityKind::Goal, "scores"), None);
    }
}
