//! Error types for the Schwab SDK.

use serde::Deserialize;

/// Result type for SDK operations.
pub type SchwabResult<T> = Result<T, SchwabError>;

/// Error types that can occur when calling the Schwab API.
#[derive(Debug, thiserror::Error)]
pub enum SchwabError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection timeout.
    #[error("Request timed out")]
    Timeout,

    /// Access token missing, expired or revoked.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl SchwabError {
    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Authentication(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Create an error from a status code and response body.
    pub fn from_response(status: u16, body: &str, retry_after_secs: Option<u64>) -> Self {
        let (message, details) = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(parsed) => parsed.into_message(),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 => Self::Authentication(message),
            404 => Self::NotFound(message),
            429 => Self::RateLimited { retry_after_secs },
            _ => Self::Api {
                status,
                message,
                details,
            },
        }
    }
}

/// Error bodies returned by the Trader, Market Data and OAuth endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "error_description")]
    error_description: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> (String, Option<String>) {
        let details = if self.errors.is_empty() {
            self.error_description.clone()
        } else {
            serde_json::to_string(&self.errors).ok()
        };

        let message = self
            .message
            .or(self.error)
            .or(self.error_description)
            .unwrap_or_else(|| "Unknown error".to_string());

        (message, details)
    }
}
