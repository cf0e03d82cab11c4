// Standalone MCP server binary (stdio)

use anyhow::{Context, Result};
use schwab_core::parse_enabled_tools;
use schwab_mcp::auth::{resolve_access_token, TokenSource, TOKEN_DB_FILE};
use schwab_mcp::tools::ToolRegistry;
use schwab_mcp::McpServer;
use schwab_sdk::{RetryConfig, SchwabClient, DEFAULT_BASE_URL};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("Schwab MCP server starting...");

    let data_dir = PathBuf::from(
        std::env::var("SCHWAB_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
    );
    let source = TokenSource {
        access_token: std::env::var("SCHWAB_ACCESS_TOKEN").ok(),
        schwab_user_id: std::env::var("SCHWAB_USER_ID").ok(),
        client_id: std::env::var("SCHWAB_CLIENT_ID").ok(),
    };
    let access_token = resolve_access_token(&source, &data_dir.join(TOKEN_DB_FILE))?;

    let base_url =
        std::env::var("SCHWAB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let client = SchwabClient::builder()
        .base_url(base_url)
        .access_token(access_token)
        .retry_config(RetryConfig::no_retry())
        .build()
        .context("Failed to build Schwab client")?;

    let enabled_tools = std::env::var("ENABLED_TOOLS").ok();
    let enabled = parse_enabled_tools(enabled_tools.as_deref());
    let registry = ToolRegistry::with_enabled(&enabled);
    tracing::info!(
        tools = ?registry.names().collect::<Vec<_>>(),
        "Registered {} tools",
        registry.len()
    );

    McpServer::new(registry, client).start().await
}
