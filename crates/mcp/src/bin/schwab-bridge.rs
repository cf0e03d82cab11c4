// Bridge binary: stdio MCP for desktop clients, forwarded to a remote server

use anyhow::{Context, Result};
use clap::Parser;
use schwab_mcp::bridge::{Bridge, BridgeConfig, BridgeError};
use schwab_mcp::transport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "schwab-bridge")]
#[command(about = "Bridge a stdio MCP client to a remote Schwab MCP server", long_about = None)]
struct Args {
    /// JSON-RPC endpoint of the remote server
    #[arg(long, env = "SCHWAB_MCP_REMOTE_URL")]
    remote_url: Url,

    /// Bearer token for the remote server
    #[arg(long, env = "SCHWAB_MCP_BRIDGE_TOKEN")]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    tracing::info!(remote = %args.remote_url, "Starting Schwab MCP bridge");

    let config = BridgeConfig {
        remote_url: args.remote_url.clone(),
        token: args.token,
        timeout: Duration::from_secs(args.timeout_secs),
    };

    let bridge = match Bridge::connect(config).await {
        Ok(bridge) => bridge,
        Err(BridgeError::Unauthorized) => {
            tracing::error!("Authentication required. The remote server rejected the bridge token.");
            tracing::error!("1. Check the [auth] token in the server's configuration");
            tracing::error!("2. Pass the same value with --token or SCHWAB_MCP_BRIDGE_TOKEN");
            tracing::error!("3. Restart this bridge");
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Failed to connect to remote server"),
    };

    tracing::info!("STDIO bridge ready");
    transport::serve_stdio(Arc::new(bridge)).await
}
