//! Configuration types for the Schwab SDK.

use std::time::Duration;
use url::Url;

/// Production API gateway.
pub const DEFAULT_BASE_URL: &str = "https://api.schwabapi.com";

/// Configuration for the Schwab client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the API gateway.
    pub base_url: Url,
    /// OAuth access token sent as a bearer token.
    pub access_token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry configuration. Only applied to GET requests.
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            access_token: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// HTTP status codes to retry on.
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }
}
