use crate::config::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Extract the bearer token from the authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(str::trim)
}

/// Check a presented token against the configured one
pub fn token_matches(expected: &str, presented: Option<&str>) -> bool {
    match presented {
        Some(presented) => expected.as_bytes().ct_eq(presented.as_bytes()).into(),
        None => false,
    }
}

/// Bearer token enforcement for the MCP endpoint
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(expected) = &state.auth_token {
        if !token_matches(expected, extract_bearer_token(req.headers())) {
            tracing::warn!(path = %req.uri().path(), "Rejected request with missing or invalid bearer token");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer token123"));
        assert_eq!(extract_bearer_token(&headers), Some("token123"));
    }

    #[test]
    fn test_token_matches() {
        assert!(token_matches("secret", Some("secret")));
        assert!(!token_matches("secret", Some("secreT")));
        assert!(!token_matches("secret", Some("secret2")));
        assert!(!token_matches("secret", Some("")));
        assert!(!token_matches("secret", None));
    }
}
