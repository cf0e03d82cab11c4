use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use schwab_core::StoredTokens;
use std::path::PathBuf;

mod api;
mod config;
mod middleware;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "schwab-server")]
#[command(about = "Schwab brokerage tools over MCP (HTTP)", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "SCHWAB_MCP_CONFIG", default_value = "schwab-mcp.toml")]
    config: PathBuf,

    /// Data directory for the token store
    #[arg(short, long, env = "SCHWAB_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "SCHWAB_MCP_PORT", default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "SCHWAB_MCP_HOST", default_value = "127.0.0.1")]
    host: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over HTTP (default)
    Serve,
    /// Manage the stored access token
    #[command(subcommand)]
    Token(TokenCommand),
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Store a token set obtained from the OAuth flow
    Import(ImportArgs),
    /// Show whether a token is stored and whether it is stale
    Status,
    /// Delete the stored token
    Clear,
}

#[derive(ClapArgs, Debug)]
struct ImportArgs {
    #[arg(long, env = "SCHWAB_ACCESS_TOKEN")]
    access_token: String,

    #[arg(long, env = "SCHWAB_REFRESH_TOKEN")]
    refresh_token: String,

    /// Access token lifetime in seconds
    #[arg(long, default_value = "1800")]
    expires_in: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schwab_server=info,schwab_mcp=info,tower_http=debug".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("Data directory: {}", args.data_dir.display());

    let config = ServerConfig::load(&args.config, args.data_dir)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let addr = format!("{}:{}", args.host, args.port);
            tracing::info!("Starting Schwab MCP server on {}", addr);
            api::serve(&addr, config).await
        }
        Command::Token(command) => run_token_command(&config, command),
    }
}

fn run_token_command(config: &ServerConfig, command: TokenCommand) -> Result<()> {
    let store = config.open_token_store()?;
    let ids = config.token_store.identifiers();
    let key = store
        .kv_key(&ids)
        .context("Set [token_store] schwab_user_id or client_id in the configuration")?;

    match command {
        TokenCommand::Import(import) => {
            let tokens = StoredTokens {
                access_token: import.access_token,
                refresh_token: import.refresh_token,
                expires_at: Some(chrono::Utc::now() + chrono::Duration::seconds(import.expires_in)),
            };
            store.save(&ids, &tokens)?;
            store.save_timestamp(&ids)?;
            tracing::info!(key = %key, "Token imported");
        }
        TokenCommand::Status => match store.load(&ids)? {
            Some(tokens) => {
                let stale = store.is_token_stale(&ids)?;
                println!("{}: stored, expires_at={:?}, stale={}", key, tokens.expires_at, stale);
            }
            None => println!("{}: no token stored", key),
        },
        TokenCommand::Clear => store.clear_token(&ids)?,
    }

    Ok(())
}
