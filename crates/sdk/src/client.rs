//! Main client for the Schwab API.

use crate::api::{MarketDataApi, TraderApi};
use crate::config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
use crate::error::{SchwabError, SchwabResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Authenticated handle to the Trader and Market Data APIs.
#[derive(Clone)]
pub struct SchwabClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl SchwabClient {
    /// Create a new client builder.
    pub fn builder() -> SchwabClientBuilder {
        SchwabClientBuilder::new()
    }

    fn from_config(config: ClientConfig) -> SchwabResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Accounts, orders, transactions and user preference.
    pub fn trader(&self) -> TraderApi<'_> {
        TraderApi::new(self)
    }

    /// Quotes, price history, option chains, instruments, market hours and movers.
    pub fn market_data(&self) -> MarketDataApi<'_> {
        MarketDataApi::new(self)
    }
}

/// Builder for creating a SchwabClient.
pub struct SchwabClientBuilder {
    base_url: Option<String>,
    access_token: Option<String>,
    timeout: Duration,
    retry_config: RetryConfig,
}

impl SchwabClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            access_token: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Override the API host. Defaults to `https://api.schwabapi.com`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// OAuth access token sent as a bearer credential.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    pub fn build(self) -> SchwabResult<SchwabClient> {
        let access_token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| SchwabError::Config("access_token is required".to_string()))?;
        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let config = ClientConfig {
            base_url,
            access_token: Some(access_token),
            timeout: self.timeout,
            retry_config: self.retry_config,
        };

        SchwabClient::from_config(config)
    }
}

impl Default for SchwabClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = SchwabClient::builder().access_token("abc").build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.schwabapi.com/");
    }

    #[test]
    fn test_builder_requires_token() {
        let result = SchwabClient::builder().build();
        assert!(matches!(result, Err(SchwabError::Config(_))));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let result = SchwabClient::builder()
            .base_url("not a url")
            .access_token("abc")
            .build();
        assert!(matches!(result, Err(SchwabError::InvalidUrl(_))));
    }
}
