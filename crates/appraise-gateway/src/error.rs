//! Error types for the request boundary.

use thiserror::Error;

/// Errors raised while parsing requests or gateway configuration.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request verb is not one the gateway understands.
    #[error("unsupported request method: {0}")]
    UnsupportedMethod(String),

    /// A configuration value could not be parsed.
    #[error("invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
