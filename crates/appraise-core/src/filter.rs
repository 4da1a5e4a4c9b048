//! Query filters over stored records.
//!
//! A [`Filter`] is the predicate language the store accepts: a small
//! tree of boolean combinators over per-field comparisons. Keeping it a
//! closed tree (rather than free-form query strings) lets the
//! encryption layer rewrite equality predicates on encrypted fields and
//! reject predicates that cannot work against ciphertext.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A predicate over a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// All sub-filters match. An empty list matches everything.
    And(Vec<Filter>),
    /// At least one sub-filter matches. An empty list matches nothing.
    Or(Vec<Filter>),
    /// The sub-filter does not match.
    Not(Box<Filter>),
    /// The field equals the value. A missing field equals `null`.
    Eq {
        /// Field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
    /// The field equals one of the values.
    In {
        /// Field name.
        field: String,
        /// Values to compare against.
        values: Vec<Value>,
    },
    /// A string field contains the substring, or an array field
    /// contains the string as an element.
    Contains {
        /// Field name.
        field: String,
        /// Substring or element to look for.
        value: String,
    },
    /// The field is strictly greater than the value.
    Gt {
        /// Field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
    /// The field is greater than or equal to the value.
    Gte {
        /// Field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
    /// The field is strictly less than the value.
    Lt {
        /// Field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
    /// The field is less than or equal to the value.
    Lte {
        /// Field name.
        field: String,
        /// Value to compare against.
        value: Value,
    },
}

impl Filter {
    /// Equality on a field.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Membership in a value set.
    #[must_use]
    pub fn is_in(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            field: field.into(),
            values,
        }
    }

    /// Substring (or array element) containment.
    #[must_use]
    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Strictly greater than.
    #[must_use]
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Greater than or equal.
    #[must_use]
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Strictly less than.
    #[must_use]
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Less than or equal.
    #[must_use]
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction of filters.
    #[must_use]
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    /// Disjunction of filters.
    #[must_use]
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Or(filters)
    }

    /// Negation of a filter.
    #[must_use]
    pub fn not(filter: Filter) -> Self {
        Self::Not(Box::new(filter))
    }

    /// The field a leaf predicate targets, or `None` for combinators.
    #[must_use]
    pub fn target_field(&self) -> Option<&str> {
        match self {
            Self::And(_) | Self::Or(_) | Self::Not(_) => None,
            Self::Eq { field, .. }
            | Self::In { field, .. }
            | Self::Contains { field, .. }
            | Self::Gt { field, .. }
            | Self::Gte { field, .. }
            | Self::Lt { field, .. }
            | Self::Lte { field, .. } => Some(field),
        }
    }

    /// A short name for the comparison operator, for error messages and
    /// log lines.
    #[must_use]
    pub fn operator(&self) -> &'static str {
        match self {
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Not(_) => "not",
            Self::Eq { .. } => "equals",
            Self::In { .. } => "in",
            Self::Contains { .. } => "contains",
            Self::Gt { .. } => "gt",
            Self::Gte { .. } => "gte",
            Self::Lt { .. } => "lt",
            Self::Lte { .. } => "lte",
        }
    }

    /// Evaluate this filter against a record.
    ///
    /// Records are JSON objects; a field that is absent compares as
    /// `null`. Ordering comparisons on values of mismatched or
    /// unordered types are false.
    #[must_use]
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            Self::And(filters) => filters.iter().all(|f| f.matches(record)),
            Self::Or(filters) => filters.iter().any(|f| f.matches(record)),
            Self::Not(filter) => !filter.matches(record),
            Self::Eq { field, value } => field_of(record, field) == value,
            Self::In { field, values } => {
                let actual = field_of(record, field);
                values.iter().any(|v| v == actual)
            },
            Self::Contains { field, value } => match field_of(record, field) {
                Value::String(s) => s.contains(value.as_str()),
                Value::Array(items) => items.iter().any(|i| i.as_str() == Some(value.as_str())),
                _ => false,
            },
            Self::Gt { field, value } => {
                compare(field_of(record, field), value) == Some(std::cmp::Ordering::Greater)
            },
            Self::Gte { field, value } => matches!(
                compare(field_of(record, field), value),
                Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)
            ),
            Self::Lt { field, value } => {
                compare(field_of(record, field), value) == Some(std::cmp::Ordering::Less)
            },
            Self::Lte { field, value } => matches!(
                compare(field_of(record, field), value),
                Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)
            ),
        }
    }
}

/// Look up a field on a record, treating missing fields as `null`.
fn field_of<'a>(record: &'a Value, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&Value::Null)
}

/// Order two values if they are of comparable types.
fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
