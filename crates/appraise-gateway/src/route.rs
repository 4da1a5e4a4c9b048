//! Verb and path classification for audit records.
//!
//! Every request is summarized as an action and a resource label before it
//! reaches the audit trail. The mapping is deliberately static: a lookup
//! table from path segments to entity names, and a closed match from verbs
//! to actions. Unknown inputs degrade to something readable rather than
//! failing the request.

use appraise_audit::AuditAction;
use appraise_core::EntityKind;
use uuid::Uuid;

use crate::http::Method;

/// Resource label used when the path has no segments at all.
pub const ROOT_RESOURCE: &str = "root";

/// Maps a request verb to the audit action it represents.
///
/// Verbs without a natural data-mutation meaning (`OPTIONS`, `TRACE`,
/// `CONNECT`) are recorded as reads, so an unexpected verb still leaves
/// a trail instead of a gap.
#[must_use]
pub fn action_for(method: Method) -> AuditAction {
    match method {
        Method::Post => AuditAction::Create,
        Method::Put | Method::Patch => AuditAction::Update,
        Method::Delete => AuditAction::Delete,
        Method::Get | Method::Head | Method::Options | Method::Trace | Method::Connect => {
            AuditAction::Read
        }
    }
}

/// Derives the audit resource label from a request path.
///
/// The first path segment is mapped through the entity table
/// (`/evaluations` becomes `Evaluation`); segments the table does not
/// know pass through verbatim. When the second segment looks like a
/// record identifier it is appended, so `/evaluations/3f2.../comments`
/// becomes `Evaluation:3f2...`.
#[must_use]
pub fn resource_for(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());

    let Some(first) = segments.next() else {
        return ROOT_RESOURCE.to_owned();
    };

    let name = match kind_for_segment(first) {
        Some(kind) => kind.as_str().to_owned(),
        None => first.to_owned(),
    };

    match segments.next() {
        Some(second) if looks_like_identifier(second) => format!("{name}:{second}"),
        _ => name,
    }
}

/// Resolves a path segment to the entity it addresses, if the segment is
/// one of the collection routes the service serves.
#[must_use]
pub fn kind_for_segment(segment: &str) -> Option<EntityKind> {
    match segment {
        "cycles" => Some(EntityKind::Cycle),
        "evaluations" => Some(EntityKind::Evaluation),
        "scores" => Some(EntityKind::Score),
        "goals" => Some(EntityKind::Goal),
        "surveys" => Some(EntityKind::Survey),
        "survey-answers" => Some(EntityKind::SurveyAnswer),
        "insights" => Some(EntityKind::Insight),
        "references" => Some(EntityKind::Reference),
        "employees" => Some(EntityKind::Employee),
        "audit" => Some(EntityKind::AuditEvent),
        _ => None,
    }
}

/// Whether a path segment has the shape of a record identifier.
///
/// Recognizes UUIDs, purely numeric ids, and cuid-style ids (a leading
/// `c` followed by at least 23 lower-case alphanumerics). Sub-collection
/// names like `comments` fall through.
fn looks_like_identifier(segment: &str) -> bool {
    if Uuid::parse_str(segment).is_ok() {
        return true;
    }
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        return true;
    }
    let mut bytes = segment.bytes();
    bytes.next() == Some(b'c')
        && segment.len() >= 24
        && bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
