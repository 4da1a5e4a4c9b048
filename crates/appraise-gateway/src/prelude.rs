//! Prelude for convenient imports.
//!
//! ```
//! use appraise_gateway::prelude::*;
//! ```

// Request model
pub use crate::http::{CORRELATION_HEADER, Method, Request, RequestBuilder, Response};

// Route classification
pub use crate::route::{ROOT_RESOURCE, action_for, kind_for_segment, resource_for};

// Observer
pub use crate::config::{DEFAULT_SKIP_PREFIXES, GatewayConfig};
pub use crate::observer::RequestObserver;

// Errors
pub use crate::error::{GatewayError, GatewayResult};
