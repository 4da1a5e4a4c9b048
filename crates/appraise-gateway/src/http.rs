//! Minimal request and response model for the audit boundary.
//!
//! The gateway does not speak HTTP on the wire. Whatever server framework
//! fronts the service adapts its native request type into [`Request`] and
//! copies [`Response`] headers back out. Keeping the model this small means
//! the observer can be tested without a socket in sight.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use appraise_core::{ActorId, CorrelationId};
use serde_json::Value;

use crate::error::GatewayError;

/// Header carrying the request correlation id, inbound and outbound.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Request verbs the gateway recognizes.
///
/// The set is closed on purpose: every verb maps to exactly one audit
/// action, and anything a front-end framework could hand us is one of
/// these nine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read a resource.
    Get,
    /// Read headers only.
    Head,
    /// Create a resource.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
    /// Capability preflight.
    Options,
    /// Diagnostic loopback.
    Trace,
    /// Tunnel establishment.
    Connect,
}

impl Method {
    /// Canonical upper-case name of the verb.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            "TRACE" => Ok(Self::Trace),
            "CONNECT" => Ok(Self::Connect),
            other => Err(GatewayError::UnsupportedMethod(other.to_owned())),
        }
    }
}

/// An inbound request as seen by the audit observer.
///
/// Header names are stored lower-cased so lookups are case-insensitive,
/// matching how HTTP headers behave in practice.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    body: Option<Value>,
    claimed_actor: Option<ActorId>,
    ip: Option<String>,
}

impl Request {
    /// Starts building a request for the given verb and path.
    pub fn builder(method: Method, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            claimed_actor: None,
            ip: None,
        }
    }

    /// The request verb.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// The request path, including the leading slash.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up a header by name, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The request body, if one was supplied.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// The actor the caller claims to be, if authentication supplied one.
    #[must_use]
    pub fn claimed_actor(&self) -> Option<&ActorId> {
        self.claimed_actor.as_ref()
    }

    /// The peer address, if the transport knows it.
    #[must_use]
    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }

    /// The `user-agent` header, if present.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.header("user-agent")
    }

    /// The inbound correlation id, if the caller sent a usable one.
    #[must_use]
    pub fn correlation_id(&self) -> Option<CorrelationId> {
        self.header(CORRELATION_HEADER)
            .and_then(CorrelationId::from_header)
    }
}

/// Builder for [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    headers: HashMap<String, String>,
    body: Option<Value>,
    claimed_actor: Option<ActorId>,
    ip: Option<String>,
}

impl RequestBuilder {
    /// Adds a header. Names are lower-cased on insert.
    #[must_use]
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the authenticated caller identity.
    #[must_use]
    pub fn claimed_actor(mut self, actor: ActorId) -> Self {
        self.claimed_actor = Some(actor);
        self
    }

    /// Sets the peer address.
    #[must_use]
    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Finishes the build.
    #[must_use]
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            path: self.path,
            headers: self.headers,
            body: self.body,
            claimed_actor: self.claimed_actor,
            ip: self.ip,
        }
    }
}

/// An outbound response as seen by the audit observer.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Value>,
}

impl Response {
    /// Creates an empty response with the given status code.
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Creates an empty `200 OK` response.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Attaches a body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// The status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The response body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Looks up a header by name, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Sets a header, replacing any previous value.
    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_method_parses_case_insensitively() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
    }

    #[test]
    fn test_method_rejects_unknown_verb() {
        let err = "BREW".parse::<Method>().unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedMethod(ref v) if v == "BREW"));
    }

    #[test]
    fn test_request_headers_are_case_insensitive() {
        let request = Request::builder(Method::Get, "/evaluations")
            .header("X-Correlation-Id", "abc-123")
            .header("User-Agent", "integration-suite/1.0")
            .build();

        assert_eq!(request.header("x-correlation-id"), Some("abc-123"));
        assert_eq!(request.header("X-CORRELATION-ID"), Some("abc-123"));
        assert_eq!(request.user_agent(), Some("integration-suite/1.0"));
    }

    #[test]
    fn test_request_correlation_id_requires_non_blank_header() {
        let with_id = Request::builder(Method::Get, "/")
            .header(CORRELATION_HEADER, "abc-123")
            .build();
        assert_eq!(with_id.correlation_id().unwrap().as_str(), "abc-123");

        let blank = Request::builder(Method::Get, "/")
            .header(CORRELATION_HEADER, "   ")
            .build();
        assert!(blank.correlation_id().is_none());

        let absent = Request::builder(Method::Get, "/").build();
        assert!(absent.correlation_id().is_none());
    }

    #[test]
    fn test_request_builder_carries_body_and_identity() {
        let request = Request::builder(Method::Post, "/evaluations")
            .body(json!({"feedback": "great work"}))
            .claimed_actor(ActorId::new("mgr-1"))
            .ip("10.0.0.8")
            .build();

        assert_eq!(request.body().unwrap()["feedback"], "great work");
        assert_eq!(request.claimed_actor().unwrap().as_str(), "mgr-1");
        assert_eq!(request.ip(), Some("10.0.0.8"));
    }

    #[test]
    fn test_response_header_roundtrip() {
        let mut response = Response::ok().with_body(json!({"id": "eval-1"}));
        response.set_header("X-Correlation-Id", "abc-123");

        assert!(response.is_success());
        assert_eq!(response.header("x-correlation-id"), Some("abc-123"));
        assert_eq!(response.body().unwrap()["id"], "eval-1");
    }
}
