// MCP server: answers protocol requests against the tool registry

use crate::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
};
use crate::tools::ToolRegistry;
use crate::transport::{self, RequestHandler};
use anyhow::Result;
use schwab_sdk::SchwabClient;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct McpServer {
    registry: Arc<ToolRegistry>,
    client: SchwabClient,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, client: SchwabClient) -> Self {
        Self {
            registry: Arc::new(registry),
            client,
            info: ServerInfo::new("schwab-mcp"),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Serve JSON-RPC over stdin/stdout until stdin closes.
    pub async fn start(self) -> Result<()> {
        info!(tools = self.registry.len(), "MCP server listening on stdio");
        transport::serve_stdio(Arc::new(self)).await
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match serde_json::from_value(params.unwrap_or(Value::Null)) {
            Ok(params) => params,
            Err(e) => return JsonRpcResponse::error(id, JsonRpcError::invalid_params(e.to_string())),
        };

        debug!(tool = %params.name, "Calling tool");
        match self
            .registry
            .call(&self.client, &params.name, params.arguments)
            .await
        {
            Ok(payload) => JsonRpcResponse::from_result(id, &CallToolResult::json(&payload)),
            Err(e) => match e.to_rpc_error() {
                Some(rpc_error) => {
                    debug!(tool = %params.name, error = %e, "Tool call rejected");
                    JsonRpcResponse::error(id, rpc_error)
                }
                None => {
                    warn!(tool = %params.name, error = %e, "Tool call failed upstream");
                    JsonRpcResponse::from_result(id, &CallToolResult::error(e.to_string()))
                }
            },
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for McpServer {
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::from_result(
                id,
                &InitializeResult::new(self.info.clone(), ServerCapabilities::tools_only()),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::from_result(
                id,
                &ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => self.call_tool(id, request.params).await,
            other => JsonRpcResponse::error(id, JsonRpcError::method_not_found(other)),
        };
        Some(response)
    }
}
