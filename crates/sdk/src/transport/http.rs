//! HTTP transport layer for the Schwab SDK.

use crate::config::ClientConfig;
use crate::error::{SchwabError, SchwabResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> SchwabResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        if let Some(ref access_token) = config.access_token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", access_token))
                .map_err(|_| SchwabError::Config("Invalid access token format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    fn build_url(&self, path: &str) -> SchwabResult<url::Url> {
        self.config.base_url.join(path).map_err(SchwabError::InvalidUrl)
    }

    /// Execute a request. Retries only when `idempotent` is set, so order
    /// mutations are never replayed.
    async fn execute(&self, request_builder: RequestBuilder, idempotent: bool) -> SchwabResult<Response> {
        let retry_config = &self.config.retry_config;
        let max_retries = if idempotent { retry_config.max_retries } else { 0 };
        let mut attempts = 0;

        loop {
            let request = request_builder
                .try_clone()
                .ok_or_else(|| SchwabError::Config("Request cannot be cloned".to_string()))?;

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        return Ok(response);
                    }

                    if attempts < max_retries && retry_config.should_retry_status(status) {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            status = status,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let retry_after = response
                        .headers()
                        .get(header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse().ok());
                    let body = response.text().await.unwrap_or_default();
                    return Err(SchwabError::from_response(status, &body, retry_after));
                }
                Err(e) => {
                    if e.is_timeout() {
                        if attempts < max_retries {
                            let backoff = retry_config.backoff_for_attempt(attempts);
                            warn!(
                                attempt = attempts + 1,
                                backoff_ms = backoff.as_millis(),
                                "Request timed out, retrying"
                            );
                            tokio::time::sleep(backoff).await;
                            attempts += 1;
                            continue;
                        }
                        return Err(SchwabError::Timeout);
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Read a JSON body, treating an empty body as `null`.
    async fn read_json<T: DeserializeOwned>(response: Response) -> SchwabResult<T> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Order endpoints answer 201 with the new order in the Location header.
    fn location(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SchwabResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url), true).await?;
        Self::read_json(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> SchwabResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        let response = self.execute(self.client.get(url).query(query), true).await?;
        Self::read_json(response).await
    }

    /// Execute a POST request, returning the Location header.
    pub async fn post_for_location<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SchwabResult<Option<String>> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url).json(body), false).await?;
        Ok(Self::location(&response))
    }

    /// Execute a PUT request, returning the Location header.
    pub async fn put_for_location<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> SchwabResult<Option<String>> {
        let url = self.build_url(path)?;
        debug!(url = %url, "PUT request");

        let response = self.execute(self.client.put(url).json(body), false).await?;
        Ok(Self::location(&response))
    }

    /// Execute a DELETE request without a response body.
    pub async fn delete_no_response(&self, path: &str) -> SchwabResult<()> {
        let url = self.build_url(path)?;
        debug!(url = %url, "DELETE request (no response)");

        self.execute(self.client.delete(url), false).await?;
        Ok(())
    }
}
