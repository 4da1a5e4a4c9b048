//! The closed set of entity kinds the platform persists.
//!
//! Entity dispatch is an enum rather than free-form strings so that a
//! typo in an entity name is a compile error (or an explicit parse
//! failure at the boundary), never a silently-unencrypted record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A persisted entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// A review cycle grouping evaluations and goals.
    Cycle,
    /// A written evaluation of an employee within a cycle.
    Evaluation,
    /// A single criterion score inside an evaluation.
    Score,
    /// A development goal set during a cycle.
    Goal,
    /// A feedback survey sent to reviewers.
    Survey,
    /// One answer inside a survey.
    SurveyAnswer,
    /// A generated insight summarizing review data.
    Insight,
    /// A peer reference written for an employee.
    Reference,
    /// An employee identity record.
    Employee,
    /// A persisted audit event.
    AuditEvent,
}

impl EntityKind {
    /// Every supported entity kind.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Cycle,
        EntityKind::Evaluation,
        EntityKind::Score,
        EntityKind::Goal,
        EntityKind::Survey,
        EntityKind::SurveyAnswer,
        EntityKind::Insight,
        EntityKind::Reference,
        EntityKind::Employee,
        EntityKind::AuditEvent,
    ];

    /// The canonical model name, as used in audit resource labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cycle => "Cycle",
            Self::Evaluation => "Evaluation",
            Self::Score => "Score",
            Self::Goal => "Goal",
            Self::Survey => "Survey",
            Self::SurveyAnswer => "SurveyAnswer",
            Self::Insight => "Insight",
            Self::Reference => "Reference",
            Self::Employee => "Employee",
            Self::AuditEvent => "AuditEvent",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cycle" => Ok(Self::Cycle),
            "Evaluation" => Ok(Self::Evaluation),
            "Score" => Ok(Self::Score),
            "Goal" => Ok(Self::Goal),
            "Survey" => Ok(Self::Survey),
            "SurveyAnswer" => Ok(Self::SurveyAnswer),
            "Insight" => Ok(Self::Insight),
            "Reference" => Ok(Self::Reference),
            "Employee" => Ok(Self::Employee),
            "AuditEvent" => Ok(Self::AuditEvent),
            other => Err(CoreError::UnknownEntity {
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_name() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = "Payroll".parse::<EntityKind>().unwrap_err();
        assert!(err.to_string().contains("Payroll"));
    }
}
