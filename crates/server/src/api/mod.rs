use crate::config::{AppState, ServerConfig};
use crate::middleware::auth::require_bearer;
use anyhow::Result;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("MCP endpoint listening on http://{}/mcp", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let protected = Router::new()
        .route("/mcp", post(handlers::mcp_message))
        .route("/api/tools", get(handlers::list_tools))
        .route("/api/token/status", get(handlers::token_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "schwab-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Custom error type for API handlers
pub struct ApiError(anyhow::Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_msg = self.0.to_string();
        let details = self.0.chain().skip(1).map(|e| e.to_string()).collect::<Vec<_>>().join(": ");

        tracing::error!(error = %error_msg, details = %details, "Request failed");

        let response = if details.is_empty() {
            ErrorResponse::new(error_msg)
        } else {
            ErrorResponse::with_details(error_msg, details)
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, ToolsConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use schwab_sdk::SchwabClient;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn router(base_url: &str, data_dir: &TempDir, auth_token: Option<&str>) -> Router {
        let config = ServerConfig {
            data_dir: data_dir.path().to_path_buf(),
            tools: ToolsConfig {
                enabled: Some("getQuotes,getAccountNumbers".to_string()),
            },
            auth: AuthConfig {
                token: auth_token.map(str::to_string),
            },
            ..Default::default()
        };
        let client = SchwabClient::builder()
            .base_url(base_url)
            .access_token("token")
            .build()
            .unwrap();
        create_router(AppState::with_client(&config, client))
    }

    fn rpc(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = TempDir::new().unwrap();
        let app = router("http://127.0.0.1:9", &dir, Some("secret"));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_tools_list_over_http() {
        let dir = TempDir::new().unwrap();
        let app = router("http://127.0.0.1:9", &dir, None);

        let response = app
            .oneshot(rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let names: Vec<&str> = body["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["getAccountNumbers", "getQuotes"]);
    }

    #[tokio::test]
    async fn test_tool_call_over_http() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/marketdata/v1/quotes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"AAPL": {"quote": {}}})))
            .mount(&mock)
            .await;

        let dir = TempDir::new().unwrap();
        let app = router(&mock.uri(), &dir, None);
        let response = app
            .oneshot(rpc(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "method": "tools/call",
                "params": {"name": "getQuotes", "arguments": {"symbols": "AAPL"}}
            })))
            .await
            .unwrap();

        let body = json_body(response).await;
        let text = body["result"]["content"][0]["text"].as_str().unwrap();
        assert_eq!(serde_json::from_str::<Value>(text).unwrap(), json!({"AAPL": {"quote": {}}}));
    }

    #[tokio::test]
    async fn test_notification_is_accepted() {
        let dir = TempDir::new().unwrap();
        let app = router("http://127.0.0.1:9", &dir, None);

        let response = app
            .oneshot(rpc(json!({"jsonrpc": "2.0", "method": "notifications/initialized"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_bearer_token_required() {
        let dir = TempDir::new().unwrap();
        let app = router("http://127.0.0.1:9", &dir, Some("secret"));

        let response = app
            .clone()
            .oneshot(rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = rpc(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}));
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, "Bearer secret".parse().unwrap());
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["result"], json!({}));
    }

    #[tokio::test]
    async fn test_token_status_without_identifiers_is_error() {
        let dir = TempDir::new().unwrap();
        let app = router("http://127.0.0.1:9", &dir, None);

        let response = app
            .oneshot(Request::get("/api/token/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_list_tools_summary() {
        let dir = TempDir::new().unwrap();
        let app = router("http://127.0.0.1:9", &dir, None);

        let response = app
            .oneshot(Request::get("/api/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["tools"].as_array().unwrap().len(), 2);
        assert_eq!(body["tools"][0]["name"], "getAccountNumbers");
    }
}
