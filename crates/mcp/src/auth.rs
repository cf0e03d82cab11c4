// Access token resolution for the server binaries

use anyhow::{Context, Result};
use schwab_core::{RedbTokenStore, StoredTokens, TokenIdentifiers};
use std::path::Path;
use tracing::{info, warn};

/// File name of the token database inside the data directory.
pub const TOKEN_DB_FILE: &str = "tokens.redb";

/// Where to find an access token.
#[derive(Debug, Clone, Default)]
pub struct TokenSource {
    /// Token given directly (environment or config); wins over the store
    pub access_token: Option<String>,
    pub schwab_user_id: Option<String>,
    pub client_id: Option<String>,
}

impl TokenSource {
    fn identifiers(&self) -> TokenIdentifiers {
        TokenIdentifiers {
            schwab_user_id: self.schwab_user_id.clone(),
            client_id: self.client_id.clone(),
        }
    }
}

/// Resolve the bearer token to use against the API.
///
/// `db_path` is the token database, usually `<data dir>/tokens.redb`. A token
/// stored under the client id is moved to the user id key once the user id
/// is known.
pub fn resolve_access_token(source: &TokenSource, db_path: &Path) -> Result<String> {
    if let Some(token) = source.access_token.as_ref().filter(|t| !t.is_empty()) {
        info!("Using access token from configuration");
        return Ok(token.clone());
    }

    let store: RedbTokenStore<StoredTokens> =
        RedbTokenStore::new(db_path.to_path_buf()).context("Failed to open token store")?;
    let ids = source.identifiers();

    if let (Some(_), Some(client_id)) = (&source.schwab_user_id, &source.client_id) {
        store.migrate_if_needed(&TokenIdentifiers::client(client_id.clone()), &ids)?;
    }

    let tokens = store
        .load(&ids)?
        .with_context(|| format!("No stored token under {}", store.kv_key(&ids).unwrap_or_default()))?;

    if store.is_token_stale(&ids)? {
        warn!("Stored token is older than the refresh token lifetime; re-authorization may be required");
    }

    Ok(tokens.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tokens(access: &str) -> StoredTokens {
        StoredTokens {
            access_token: access.to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: None,
        }
    }

    #[test]
    fn test_explicit_token_wins() {
        let dir = TempDir::new().unwrap();
        let source = TokenSource {
            access_token: Some("direct".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_access_token(&source, &dir.path().join(TOKEN_DB_FILE)).unwrap(), "direct");
    }

    #[test]
    fn test_token_loaded_from_store() {
        let dir = TempDir::new().unwrap();
        {
            let store: RedbTokenStore<StoredTokens> =
                RedbTokenStore::new(dir.path().join(TOKEN_DB_FILE)).unwrap();
            store.save(&TokenIdentifiers::user("user-1"), &tokens("stored")).unwrap();
        }

        let source = TokenSource {
            schwab_user_id: Some("user-1".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_access_token(&source, &dir.path().join(TOKEN_DB_FILE)).unwrap(), "stored");
    }

    #[test]
    fn test_client_keyed_token_migrated() {
        let dir = TempDir::new().unwrap();
        {
            let store: RedbTokenStore<StoredTokens> =
                RedbTokenStore::new(dir.path().join(TOKEN_DB_FILE)).unwrap();
            store.save(&TokenIdentifiers::client("client-1"), &tokens("legacy")).unwrap();
        }

        let source = TokenSource {
            schwab_user_id: Some("user-1".to_string()),
            client_id: Some("client-1".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_access_token(&source, &dir.path().join(TOKEN_DB_FILE)).unwrap(), "legacy");

        let store: RedbTokenStore<StoredTokens> =
            RedbTokenStore::new(dir.path().join(TOKEN_DB_FILE)).unwrap();
        assert!(store.load(&TokenIdentifiers::client("client-1")).unwrap().is_none());
    }

    #[test]
    fn test_missing_token_is_error() {
        let dir = TempDir::new().unwrap();
        let source = TokenSource {
            client_id: Some("client-1".to_string()),
            ..Default::default()
        };
        assert!(resolve_access_token(&source, &dir.path().join(TOKEN_DB_FILE)).is_err());
    }
}
