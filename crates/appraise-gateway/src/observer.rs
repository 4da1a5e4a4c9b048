//! Per-request audit observation.
//!
//! [`RequestObserver::observe`] wraps a request handler: it captures the
//! request context up front, runs the handler, then records exactly one
//! audit event describing how the request ended. The event write happens
//! on its own task so a slow audit backend delays request teardown by at
//! most the configured bound, and a request aborted mid-handler still
//! leaves an event behind via a drop guard.
//!
//! Auditing never changes the handler's result. Errors are re-raised to
//! the caller unchanged after the event is recorded.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use appraise_audit::{AuditAction, AuditDraft, AuditOutcome, AuditRecorder};
use appraise_core::{ActorId, CorrelationId};
use tracing::{error, warn};

use crate::config::GatewayConfig;
use crate::http::{CORRELATION_HEADER, Method, Request, Response};
use crate::route;

/// Wraps request handlers with audit recording and correlation ids.
#[derive(Debug, Clone)]
pub struct RequestObserver {
    recorder: Arc<AuditRecorder>,
    config: GatewayConfig,
}

impl RequestObserver {
    /// Creates an observer writing through the given recorder.
    #[must_use]
    pub fn new(recorder: Arc<AuditRecorder>, config: GatewayConfig) -> Self {
        Self { recorder, config }
    }

    /// The observer's configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Runs a handler under audit observation.
    ///
    /// The response carries the request's correlation id in
    /// [`CORRELATION_HEADER`], newly generated when the caller did not
    /// send one. Paths under a skip prefix run the handler directly and
    /// produce no audit event. Handler errors are returned unchanged
    /// after a `FAILURE` event is recorded.
    pub async fn observe<H, Fut, E>(&self, request: Request, handler: H) -> Result<Response, E>
    where
        H: FnOnce(Request) -> Fut,
        Fut: Future<Output = Result<Response, E>>,
        E: std::fmt::Display,
    {
        let correlation = request
            .correlation_id()
            .unwrap_or_else(CorrelationId::generate);

        if self.config.is_skipped(request.path()) {
            let mut response = handler(request).await?;
            response.set_header(CORRELATION_HEADER, correlation.as_str());
            return Ok(response);
        }

        let context = RequestContext::capture(&request, correlation.clone());
        let mut guard = CancelGuard::armed(Arc::clone(&self.recorder), context.clone());

        let outcome = handler(request).await;
        guard.disarm();

        match outcome {
            Ok(mut response) => {
                self.dispatch(context.success_draft(&response)).await;
                response.set_header(CORRELATION_HEADER, correlation.as_str());
                Ok(response)
            }
            Err(err) => {
                self.dispatch(context.failure_draft(&err.to_string())).await;
                Err(err)
            }
        }
    }

    /// Records a domain-level audit event outside the request wrapper.
    ///
    /// Handlers use this for events the route summary cannot express,
    /// e.g. a login or an access denial. Same write path and bound as
    /// request events.
    pub async fn audit_log(&self, draft: AuditDraft) {
        self.dispatch(draft).await;
    }

    /// Spawns the audit write and waits for it up to the configured
    /// bound. A write that outlives the bound keeps running detached;
    /// it is the recorder's job to log its own outcome.
    async fn dispatch(&self, draft: AuditDraft) {
        let recorder = Arc::clone(&self.recorder);
        let write = tokio::spawn(async move {
            recorder.record(draft).await;
        });

        match tokio::time::timeout(self.config.audit_write_timeout, write).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(error = %err, "audit write task failed"),
            Err(_) => warn!(
                timeout_ms = u64::try_from(self.config.audit_write_timeout.as_millis())
                    .unwrap_or(u64::MAX),
                "audit write still in flight after bound, leaving it to finish in the background"
            ),
        }
    }
}

/// Request facts captured before the handler runs, so an audit event can
/// be assembled even if the handler consumed or never returned the
/// request.
#[derive(Debug, Clone)]
struct RequestContext {
    claimed_actor: Option<ActorId>,
    action: AuditAction,
    resource: String,
    correlation: CorrelationId,
    method: Method,
    path: String,
    ip: Option<String>,
    user_agent: Option<String>,
    started: Instant,
}

impl RequestContext {
    fn capture(request: &Request, correlation: CorrelationId) -> Self {
        Self {
            claimed_actor: request.claimed_actor().cloned(),
            action: route::action_for(request.method()),
            resource: route::resource_for(request.path()),
            correlation,
            method: request.method(),
            path: request.path().to_owned(),
            ip: request.ip().map(ToOwned::to_owned),
            user_agent: request.user_agent().map(ToOwned::to_owned),
            started: Instant::now(),
        }
    }

    fn draft(self, outcome: AuditOutcome) -> AuditDraft {
        let duration_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let mut draft = AuditDraft::new(self.action, self.resource, self.correlation)
            .outcome(outcome)
            .context("method", self.method.as_str())
            .context("path", self.path)
            .context("durationMs", duration_ms);
        if let Some(actor) = self.claimed_actor {
            draft = draft.claimed_by(actor);
        }
        if let Some(ip) = self.ip {
            draft = draft.ip(ip);
        }
        if let Some(agent) = self.user_agent {
            draft = draft.user_agent(agent);
        }
        draft
    }

    fn success_draft(self, response: &Response) -> AuditDraft {
        let status = response.status();
        let body = response.body().cloned();

        let mut draft = self
            .draft(AuditOutcome::Success)
            .context("status", status);
        if let Some(body) = body {
            draft = draft.new_value(body);
        }
        draft
    }

    fn failure_draft(self, error: &str) -> AuditDraft {
        self.draft(AuditOutcome::Failure).context("error", error)
    }

    fn aborted_draft(self) -> AuditDraft {
        self.draft(AuditOutcome::Error)
            .context("error", "request aborted before the handler finished")
    }
}

/// Records an `ERROR` audit event if the request future is dropped while
/// the handler is still running.
///
/// Cancellation means `observe` never reaches its own recording step, so
/// the guard's `Drop` spawns a best-effort write instead. Disarmed as
/// soon as the handler returns.
#[derive(Debug)]
struct CancelGuard {
    pending: Option<(Arc<AuditRecorder>, RequestContext)>,
}

impl CancelGuard {
    fn armed(recorder: Arc<AuditRecorder>, context: RequestContext) -> Self {
        Self {
            pending: Some((recorder, context)),
        }
    }

    fn disarm(&mut self) {
        self.pending = None;
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        let Some((recorder, context)) = self.pending.take() else {
            return;
        };
        let draft = context.aborted_draft();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    recorder.record(draft).await;
                });
            }
            Err(_) => warn!(
                "request aborted outside a runtime, dropping its audit event"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use appraise_audit::{
        ActorResolver, AuditError, AuditEvent, AuditResult, AuditSink, InMemoryDirectory,
        MemorySink,
    };
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn append(&self, _event: &AuditEvent) -> AuditResult<()> {
            Err(AuditError::Sink("disk full".to_string()))
        }
    }

    struct SlowSink {
        inner: Arc<MemorySink>,
        delay: Duration,
    }

    #[async_trait]
    impl AuditSink for SlowSink {
        async fn append(&self, event: &AuditEvent) -> AuditResult<()> {
            tokio::time::sleep(self.delay).await;
            self.inner.append(event).await
        }
    }

    fn observer_with_sink(sink: Arc<dyn AuditSink>) -> RequestObserver {
        let directory = InMemoryDirectory::new();
        directory
            .insert(ActorId::new("mgr-1"), json!({"name": "Dana"}))
            .unwrap();
        let resolver = ActorResolver::new(directory.shared());
        RequestObserver::new(
            Arc::new(AuditRecorder::new(resolver, sink)),
            GatewayConfig::default(),
        )
    }

    fn fixture() -> (RequestObserver, Arc<MemorySink>) {
        let sink = MemorySink::new().shared();
        let observer = observer_with_sink(Arc::clone(&sink) as Arc<dyn AuditSink>);
        (observer, sink)
    }

    #[tokio::test]
    async fn test_success_is_audited_with_route_summary() {
        let (observer, sink) = fixture();
        let request = Request::builder(Method::Post, "/references")
            .claimed_actor(ActorId::new("mgr-1"))
            .ip("10.0.0.8")
            .header("user-agent", "review-web/4.1")
            .build();

        let response = observer
            .observe(request, |_req| async {
                Ok::<_, String>(Response::new(201).with_body(json!({"id": "ref-9"})))
            })
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        let events = sink.events();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.action, AuditAction::Create);
        assert_eq!(event.resource, "Reference");
        assert_eq!(event.actor_id.as_str(), "mgr-1");
        assert_eq!(event.metadata.result, AuditOutcome::Success);
        assert_eq!(event.metadata.new_value, Some(json!({"id": "ref-9"})));
        assert_eq!(event.metadata.ip.as_deref(), Some("10.0.0.8"));
        assert_eq!(event.metadata.additional_context["status"], 201);
        assert_eq!(event.metadata.additional_context["method"], "POST");
        assert!(event.metadata.additional_context["durationMs"].is_u64());
    }

    #[tokio::test]
    async fn test_inbound_correlation_id_is_echoed_and_threaded() {
        let (observer, sink) = fixture();
        let request = Request::builder(Method::Get, "/goals")
            .header(CORRELATION_HEADER, "abc-123")
            .build();

        let response = observer
            .observe(request, |_req| async { Ok::<_, String>(Response::ok()) })
            .await
            .unwrap();

        assert_eq!(response.header(CORRELATION_HEADER), Some("abc-123"));
        assert_eq!(sink.events()[0].metadata.correlation_id.as_str(), "abc-123");
    }

    #[tokio::test]
    async fn test_generated_correlation_id_matches_event() {
        let (observer, sink) = fixture();
        let request = Request::builder(Method::Get, "/goals").build();

        let response = observer
            .observe(request, |_req| async { Ok::<_, String>(Response::ok()) })
            .await
            .unwrap();

        let header = response.header(CORRELATION_HEADER).unwrap().to_owned();
        assert!(!header.is_empty());
        assert_eq!(sink.events()[0].metadata.correlation_id.as_str(), header);
    }

    #[tokio::test]
    async fn test_handler_error_is_reraised_after_failure_event() {
        let (observer, sink) = fixture();
        let request = Request::builder(Method::Delete, "/goals/42").build();

        let err = observer
            .observe(request, |_req| async {
                Err::<Response, String>("goal is locked".to_string())
            })
            .await
            .unwrap_err();
        assert_eq!(err, "goal is locked");

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::Delete);
        assert_eq!(events[0].resource, "Goal:42");
        assert_eq!(events[0].metadata.result, AuditOutcome::Failure);
        assert_eq!(
            events[0].metadata.additional_context["error"],
            "goal is locked"
        );
    }

    #[tokio::test]
    async fn test_skip_prefixes_bypass_auditing_but_keep_correlation() {
        let (observer, sink) = fixture();
        let request = Request::builder(Method::Get, "/health/live")
            .header(CORRELATION_HEADER, "abc-123")
            .build();

        let response = observer
            .observe(request, |_req| async { Ok::<_, String>(Response::ok()) })
            .await
            .unwrap();

        assert_eq!(response.header(CORRELATION_HEADER), Some("abc-123"));
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn test_failing_sink_never_fails_the_request() {
        let observer = observer_with_sink(Arc::new(FailingSink));
        let request = Request::builder(Method::Post, "/evaluations")
            .body(json!({"feedback": "great work"}))
            .build();

        let response = observer
            .observe(request, |_req| async {
                Ok::<_, String>(Response::new(201))
            })
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    async fn test_slow_sink_delays_the_request_only_up_to_the_bound() {
        let inner = MemorySink::new().shared();
        let slow = Arc::new(SlowSink {
            inner: Arc::clone(&inner),
            delay: Duration::from_millis(300),
        });
        let observer = observer_with_sink(slow as Arc<dyn AuditSink>);
        let observer = RequestObserver::new(
            Arc::clone(&observer.recorder),
            GatewayConfig::default().with_audit_write_timeout(Duration::from_millis(25)),
        );

        let started = Instant::now();
        observer
            .observe(
                Request::builder(Method::Get, "/goals").build(),
                |_req| async { Ok::<_, String>(Response::ok()) },
            )
            .await
            .unwrap();
        assert!(started.elapsed() < Duration::from_millis(250));

        // The detached write still lands.
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(inner.events().len(), 1);
    }

    #[tokio::test]
    async fn test_aborted_request_still_leaves_an_event() {
        let (observer, sink) = fixture();
        let observer = Arc::new(observer);

        let task = tokio::spawn({
            let observer = Arc::clone(&observer);
            async move {
                let request = Request::builder(Method::Put, "/goals/42").build();
                observer
                    .observe(request, |_req| {
                        std::future::pending::<Result<Response, String>>()
                    })
                    .await
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        task.abort();
        let _ = task.await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.result, AuditOutcome::Error);
        assert_eq!(events[0].resource, "Goal:42");
    }

    #[tokio::test]
    async fn test_audit_log_records_domain_events() {
        let (observer, sink) = fixture();

        observer
            .audit_log(
                AuditDraft::new(AuditAction::Login, "Employee:mgr-1", CorrelationId::generate())
                    .claimed_by(ActorId::new("mgr-1")),
            )
            .await;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, AuditAction::Login);
    }
}
