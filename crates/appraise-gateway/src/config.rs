//! Gateway configuration.

use std::env;
use std::time::Duration;

use crate::error::{GatewayError, GatewayResult};

/// Environment variable overriding the audited-path skip list.
///
/// Comma-separated path prefixes, e.g. `/health,/metrics`.
pub const SKIP_PREFIXES_VAR: &str = "APPRAISE_AUDIT_SKIP_PREFIXES";

/// Environment variable overriding the audit write bound, in milliseconds.
pub const WRITE_TIMEOUT_VAR: &str = "APPRAISE_AUDIT_WRITE_TIMEOUT_MS";

/// Path prefixes that never produce audit events.
///
/// Health probes and documentation are pure noise in a trail, and the
/// login route is excluded because its request body carries credentials.
pub const DEFAULT_SKIP_PREFIXES: [&str; 4] = ["/health", "/docs", "/auth/login", "/auth/roles"];

const DEFAULT_AUDIT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the request observer.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Path prefixes exempt from auditing.
    pub skip_prefixes: Vec<String>,
    /// How long a request will wait for its audit write before letting
    /// the write finish in the background.
    pub audit_write_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(ToString::to_string).collect(),
            audit_write_timeout: DEFAULT_AUDIT_WRITE_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the environment, falling back to the
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] when the write timeout
    /// variable is present but not a number of milliseconds.
    pub fn from_env() -> GatewayResult<Self> {
        let mut config = Self::default();

        if let Ok(prefixes) = env::var(SKIP_PREFIXES_VAR) {
            config.skip_prefixes = prefixes
                .split(',')
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .map(ToString::to_string)
                .collect();
        }

        if let Ok(timeout) = env::var(WRITE_TIMEOUT_VAR) {
            let millis: u64 = timeout.trim().parse().map_err(|_| {
                GatewayError::InvalidConfig(format!(
                    "{WRITE_TIMEOUT_VAR} must be an integer number of milliseconds, got {timeout:?}"
                ))
            })?;
            config.audit_write_timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Replaces the skip list.
    #[must_use]
    pub fn with_skip_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the audit write bound.
    #[must_use]
    pub fn with_audit_write_timeout(mut self, timeout: Duration) -> Self {
        self.audit_write_timeout = timeout;
        self
    }

    /// Whether a request path falls under a skip prefix.
    #[must_use]
    pub fn is_skipped(&self, path: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_skip_probes_and_credentials() {
        let config = GatewayConfig::default();

        assert!(config.is_skipped("/health"));
        assert!(config.is_skipped("/health/live"));
        assert!(config.is_skipped("/auth/login"));
        assert!(config.is_skipped("/docs/openapi.json"));
        assert!(!config.is_skipped("/evaluations"));
        assert_eq!(config.audit_write_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_env_falls_back_to_defaults() {
        // Neither variable is set under the test runner.
        let config = GatewayConfig::from_env().unwrap();
        assert_eq!(config.skip_prefixes, GatewayConfig::default().skip_prefixes);
        assert_eq!(config.audit_write_timeout, DEFAULT_AUDIT_WRITE_TIMEOUT);
    }

    #[test]
    fn test_builders_override_fields() {
        let config = GatewayConfig::new()
            .with_skip_prefixes(["/internal"])
            .with_audit_write_timeout(Duration::from_millis(50));

        assert!(config.is_skipped("/internal/cache"));
        assert!(!config.is_skipped("/health"));
        assert_eq!(config.audit_write_timeout, Duration::from_millis(50));
    }
}
