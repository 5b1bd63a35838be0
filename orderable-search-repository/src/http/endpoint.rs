//! Connection settings for one upstream service.

use std::time::Duration;

use url::Url;

use crate::errors::UpstreamError;

/// Per-call timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where an upstream service lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Base URL; request paths are appended to it.
    pub base_url: Url,
    /// Sent as `Authorization: Bearer <token>` when set.
    pub bearer_token: Option<String>,
    /// Upper bound on a single call. A call that times out is a transport failure.
    pub timeout: Duration,
}

impl EndpointConfig {
    /// Create an endpoint configuration from a base URL string.
    ///
    /// # Returns
    ///
    /// * `Ok(EndpointConfig)` - With no token and the default timeout
    /// * `Err(UpstreamError::ConfigError)` - If the URL cannot be parsed
    pub fn new(base_url: &str) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamError::config(format!("Invalid URL '{}': {}", base_url, e)))?;

        Ok(Self {
            base_url,
            bearer_token: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.bearer_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
