use anyhow::{Context, Result};
use schwab_core::{parse_enabled_tools, RedbTokenStore, StoredTokens, TokenIdentifiers};
use schwab_mcp::auth::{resolve_access_token, TokenSource};
use schwab_mcp::{McpServer, ToolRegistry};
use schwab_sdk::{RetryConfig, SchwabClient, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub schwab: SchwabConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub token_store: TokenStoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchwabConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for GET requests; order mutations are never replayed
    #[serde(default)]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SchwabConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Same grammar as `ENABLED_TOOLS`; absent means the core set
    #[serde(default)]
    pub enabled: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token required on `/mcp`. No token disables the check.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStoreConfig {
    #[serde(default = "default_token_file")]
    pub file: String,

    #[serde(default)]
    pub schwab_user_id: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    /// Skips the store entirely when set
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_token_file() -> String {
    schwab_mcp::auth::TOKEN_DB_FILE.to_string()
}

impl Default for TokenStoreConfig {
    fn default() -> Self {
        Self {
            file: default_token_file(),
            schwab_user_id: None,
            client_id: None,
            access_token: None,
        }
    }
}

impl TokenStoreConfig {
    pub fn identifiers(&self) -> TokenIdentifiers {
        TokenIdentifiers {
            schwab_user_id: self.schwab_user_id.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path, data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        let mut config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .context("Failed to read configuration file")?;
            toml::from_str(&content).context("Failed to parse configuration file")?
        } else {
            tracing::info!("Configuration file not found, using defaults");
            Self::default()
        };

        config.data_dir = data_dir;

        Ok(config)
    }

    /// Get the token database path
    pub fn token_db_path(&self) -> PathBuf {
        self.data_dir.join(&self.token_store.file)
    }

    pub fn open_token_store(&self) -> Result<RedbTokenStore<StoredTokens>> {
        RedbTokenStore::new(self.token_db_path()).context("Failed to open token store")
    }

    fn token_source(&self) -> TokenSource {
        TokenSource {
            access_token: self.token_store.access_token.clone(),
            schwab_user_id: self.token_store.schwab_user_id.clone(),
            client_id: self.token_store.client_id.clone(),
        }
    }

    fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.schwab.max_retries,
            ..Default::default()
        }
    }

    pub fn build_client(&self, access_token: String) -> Result<SchwabClient> {
        SchwabClient::builder()
            .base_url(self.schwab.base_url.clone())
            .access_token(access_token)
            .timeout(Duration::from_secs(self.schwab.timeout_secs))
            .retry_config(self.retry_config())
            .build()
            .context("Failed to build Schwab client")
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub mcp: Arc<McpServer>,
    pub auth_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let access_token = resolve_access_token(&config.token_source(), &config.token_db_path())?;
        let client = config.build_client(access_token)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &ServerConfig, client: SchwabClient) -> Self {
        let enabled = parse_enabled_tools(config.tools.enabled.as_deref());
        let registry = ToolRegistry::with_enabled(&enabled);
        tracing::info!(
            tools = ?registry.names().collect::<Vec<_>>(),
            "Registered {} tools",
            registry.len()
        );

        let auth_token = config
            .auth
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(Arc::from);
        if auth_token.is_none() {
            tracing::warn!("No [auth] token configured, /mcp accepts unauthenticated requests");
        }

        Self {
            config: Arc::new(config.clone()),
            mcp: Arc::new(McpServer::new(registry, client)),
            auth_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let config =
            ServerConfig::load(&dir.path().join("missing.toml"), dir.path().join("data")).unwrap();

        assert!(dir.path().join("data").is_dir());
        assert_eq!(config.schwab.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.schwab.max_retries, 0);
        assert!(config.tools.enabled.is_none());
        assert_eq!(config.token_db_path(), dir.path().join("data").join("tokens.redb"));
    }

    #[test]
    fn test_load_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("schwab-mcp.toml");
        std::fs::write(
            &path,
            r#"
[schwab]
base_url = "http://localhost:9000"
max_retries = 2

[tools]
enabled = "all"

[auth]
token = "bridge-secret"

[token_store]
file = "other.redb"
schwab_user_id = "user-1"
"#,
        )
        .unwrap();

        let config = ServerConfig::load(&path, dir.path().to_path_buf()).unwrap();
        assert_eq!(config.schwab.base_url, "http://localhost:9000");
        assert_eq!(config.schwab.timeout_secs, 30);
        assert_eq!(config.retry_config().max_retries, 2);
        assert_eq!(config.tools.enabled.as_deref(), Some("all"));
        assert_eq!(config.auth.token.as_deref(), Some("bridge-secret"));
        assert_eq!(config.token_db_path(), dir.path().join("other.redb"));
        assert_eq!(config.token_store.identifiers(), TokenIdentifiers::user("user-1"));
    }

    #[test]
    fn test_app_state_filters_tools() {
        let config = ServerConfig {
            tools: ToolsConfig {
                enabled: Some("getQuotes,getOrders".to_string()),
            },
            ..Default::default()
        };
        let client = config.build_client("token".to_string()).unwrap();
        let state = AppState::with_client(&config, client);

        assert_eq!(state.mcp.registry().len(), 2);
        assert!(state.auth_token.is_none());
    }

    #[test]
    fn test_app_state_uses_stored_token() {
        let dir = TempDir::new().unwrap();
        let mut config = ServerConfig::load(&dir.path().join("none.toml"), dir.path().to_path_buf())
            .unwrap();
        config.token_store.schwab_user_id = Some("user-1".to_string());

        config
            .open_token_store()
            .unwrap()
            .save(
                &config.token_store.identifiers(),
                &StoredTokens {
                    access_token: "stored".to_string(),
                    refresh_token: "refresh".to_string(),
                    expires_at: None,
                },
            )
            .unwrap();

        assert!(AppState::new(&config).is_ok());
    }
}
