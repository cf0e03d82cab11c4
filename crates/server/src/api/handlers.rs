use super::ApiResult;
use crate::config::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schwab_mcp::RequestHandler;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JSON-RPC over HTTP: one message per POST body
pub async fn mcp_message(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// List the enabled tools
pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ListToolsResponse> {
    let tools = state
        .mcp
        .registry()
        .iter()
        .map(|spec| ToolSummary {
            name: spec.name.as_str().to_string(),
            description: spec.description.clone(),
        })
        .collect();
    Json(ListToolsResponse { tools })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListToolsResponse {
    pub tools: Vec<ToolSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
}

/// Report where the access token comes from and whether it needs renewal
pub async fn token_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<TokenStatusResponse>> {
    let config = &state.config;
    if config.token_store.access_token.is_some() {
        return Ok(Json(TokenStatusResponse {
            source: "config".to_string(),
            key: None,
            stale: false,
        }));
    }

    let ids = config.token_store.identifiers();
    let store = config.open_token_store()?;
    let key = store.kv_key(&ids)?;
    let stale = store.is_token_stale(&ids)?;

    Ok(Json(TokenStatusResponse {
        source: "store".to_string(),
        key: Some(key),
        stale,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenStatusResponse {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub stale: bool,
}
