// Stdio-to-HTTP bridge for desktop clients that only speak stdio MCP.
//
// The tool list is fetched once at startup and served from cache. Tool calls
// are forwarded to the remote server as-is.

use crate::protocol::{
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListChangedCapability,
    ServerCapabilities, ServerInfo,
};
use crate::transport::RequestHandler;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Remote server rejected the bridge token (401 Unauthorized)")]
    Unauthorized,

    #[error("Remote server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote error {}: {}", .0.code, .0.message)]
    Remote(JsonRpcError),

    #[error("Invalid response from remote: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// JSON-RPC endpoint of the remote server, e.g. `https://host/mcp`
    pub remote_url: Url,
    /// Bearer token expected by the remote server
    pub token: Option<String>,
    pub timeout: Duration,
}

impl BridgeConfig {
    pub fn new(remote_url: Url) -> Self {
        Self {
            remote_url,
            token: None,
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct Bridge {
    http: reqwest::Client,
    config: BridgeConfig,
    tools: Vec<Value>,
    next_id: AtomicU64,
    info: ServerInfo,
}

impl Bridge {
    /// Connect to the remote server and cache its tool list.
    pub async fn connect(config: BridgeConfig) -> Result<Self, BridgeError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        let mut bridge = Self {
            http,
            config,
            tools: Vec::new(),
            next_id: AtomicU64::new(1),
            info: ServerInfo::new("schwab-bridge"),
        };

        info!(remote = %bridge.config.remote_url, "Connecting to remote server");
        let listed = bridge.remote_call("tools/list", json!({})).await?;
        bridge.tools = listed
            .get("tools")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        info!(tools = bridge.tools.len(), "Loaded tools from remote server");

        Ok(bridge)
    }

    pub fn tools(&self) -> &[Value] {
        &self.tools
    }

    /// Send one request to the remote server and return its `result`.
    async fn remote_call(&self, method: &str, params: Value) -> Result<Value, BridgeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        let mut builder = self.http.post(self.config.remote_url.clone()).json(&request);
        if let Some(token) = &self.config.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(BridgeError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::InvalidResponse(e.to_string()))?;
        if let Some(error) = response.error {
            return Err(BridgeError::Remote(error));
        }
        response
            .result
            .ok_or_else(|| BridgeError::InvalidResponse("missing result".to_string()))
    }

    /// Forward a list request, falling back to an empty list.
    async fn forward_list(&self, method: &str, key: &str) -> Value {
        match self.remote_call(method, json!({})).await {
            Ok(result) => result,
            Err(e) => {
                debug!(method = method, error = %e, "Remote list unavailable, answering empty");
                json!({ key: [] })
            }
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for Bridge {
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id?;

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::from_result(
                id,
                &InitializeResult::new(
                    self.info.clone(),
                    ServerCapabilities {
                        tools: Some(ListChangedCapability::default()),
                        resources: Some(ListChangedCapability::default()),
                        prompts: Some(ListChangedCapability::default()),
                    },
                ),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": self.tools })),
            "tools/call" => {
                let params = request.params.unwrap_or(Value::Null);
                match self.remote_call("tools/call", params).await {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(BridgeError::Remote(error)) => JsonRpcResponse::error(id, error),
                    Err(e) => {
                        warn!(error = %e, "Forwarding tool call failed");
                        JsonRpcResponse::error(id, JsonRpcError::internal_error(e.to_string()))
                    }
                }
            }
            "resources/list" => {
                JsonRpcResponse::success(id, self.forward_list("resources/list", "resources").await)
            }
            "prompts/list" => {
                JsonRpcResponse::success(id, self.forward_list("prompts/list", "prompts").await)
            }
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };
        Some(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_tools_list(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/mcp"))
            .and(body_partial_json(json!({"method": "tools/list"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "result": {"tools": [{"name": "getQuotes", "description": "Get quotes", "inputSchema": {}}]}
            })))
            .mount(server)
            .await;
    }

    fn config(server: &MockServer) -> BridgeConfig {
        BridgeConfig::new(Url::parse(&format!("{}/mcp", server.uri())).unwrap())
    }

    #[tokio::test]
    async fn test_connect_caches_tools() {
        let server = MockServer::start().await;
        mount_tools_list(&server).await;

        let bridge = Bridge::connect(config(&server)).await.unwrap();
        assert_eq!(bridge.tools().len(), 1);

        let response = bridge
            .handle_request(JsonRpcRequest::new(9, "tools/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["tools"][0]["name"], "getQuotes");
        // Served from cache
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = Bridge::connect(config(&server)).await.err().unwrap();
        assert!(matches!(err, BridgeError::Unauthorized));
    }

    #[tokio::test]
    async fn test_tool_call_forwarded_with_token() {
        let server = MockServer::start().await;
        mount_tools_list(&server).await;
        Mock::given(method("POST"))
            .and(path("/mcp"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "method": "tools/call",
                "params": {"name": "getQuotes", "arguments": {"symbols": "AAPL"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "result": {"content": [{"type": "text", "text": "{}"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config(&server);
        config.token = Some("secret".to_string());
        let bridge = Bridge::connect(config).await.unwrap();

        let response = bridge
            .handle_request(JsonRpcRequest::new(
                5,
                "tools/call",
                json!({"name": "getQuotes", "arguments": {"symbols": "AAPL"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.id, json!(5));
        assert_eq!(response.result.unwrap()["content"][0]["text"], "{}");
    }

    #[tokio::test]
    async fn test_remote_error_passed_through() {
        let server = MockServer::start().await;
        mount_tools_list(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "tools/call"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": {"code": -32602, "message": "Unknown tool: getOrder"}
            })))
            .mount(&server)
            .await;

        let bridge = Bridge::connect(config(&server)).await.unwrap();
        let response = bridge
            .handle_request(JsonRpcRequest::new(
                3,
                "tools/call",
                json!({"name": "getOrder", "arguments": {}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().message, "Unknown tool: getOrder");
    }

    #[tokio::test]
    async fn test_list_fallbacks() {
        let server = MockServer::start().await;
        mount_tools_list(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "resources/list"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 2,
                "error": {"code": -32601, "message": "Method not found: resources/list"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "prompts/list"})))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let bridge = Bridge::connect(config(&server)).await.unwrap();
        let resources = bridge
            .handle_request(JsonRpcRequest::new(1, "resources/list", json!({})))
            .await
            .unwrap();
        assert_eq!(resources.result.unwrap(), json!({"resources": []}));

        let prompts = bridge
            .handle_request(JsonRpcRequest::new(2, "prompts/list", json!({})))
            .await
            .unwrap();
        assert_eq!(prompts.result.unwrap(), json!({"prompts": []}));
    }
}
