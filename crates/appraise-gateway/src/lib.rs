//! Appraise Gateway - the audited request boundary.
//!
//! This crate provides:
//! - [`RequestObserver`]: wraps request handlers so every non-exempt
//!   request leaves exactly one audit event, success or failure
//! - [`Request`] / [`Response`]: the framework-neutral request model the
//!   observer works over
//! - [`route`]: the static verb-to-action and path-to-resource mapping
//! - [`GatewayConfig`]: skip prefixes and the audit write bound
//!
//! # Correlation
//!
//! Every observed request is threaded with a correlation id: taken from
//! the `x-correlation-id` header when the caller sent one, freshly
//! generated otherwise. The id is set on the outgoing response and
//! stamped into the request's audit event, so a response in a client
//! log can be joined against the trail.
//!
//! # Bounded audit writes
//!
//! The audit write runs on its own task. Request teardown waits for it
//! up to [`GatewayConfig::audit_write_timeout`] and then moves on,
//! leaving the write to finish in the background. A request whose
//! future is dropped mid-handler still produces an event through a
//! drop guard, marked with the `ERROR` outcome.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;
pub mod route;

mod config;
mod error;
mod http;
mod observer;

pub use config::{DEFAULT_SKIP_PREFIXES, GatewayConfig, SKIP_PREFIXES_VAR, WRITE_TIMEOUT_VAR};
pub use error::{GatewayError, GatewayResult};
pub use http::{CORRELATION_HEADER, Method, Request, RequestBuilder, Response};
pub use observer::RequestObserver;
