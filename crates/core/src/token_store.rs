// OAuth token persistence on an embedded key-value store (redb)
//
// Entries carry their own expiry. A separate timestamp entry records when a
// token was last saved so callers can tell when the refresh token is about
// to lapse.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

const TOKENS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("tokens");

pub const TOKEN_KEY_PREFIX: &str = "token:";
pub const TOKEN_TIMESTAMP_KEY_PREFIX: &str = "token_ts:";

/// Stored tokens expire after 31 days
pub const TOKEN_TTL_SECS: i64 = 31 * 24 * 60 * 60;

/// Schwab refresh tokens are valid for 7 days
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Identity a token blob belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenIdentifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schwab_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl TokenIdentifiers {
    pub fn user(schwab_user_id: impl Into<String>) -> Self {
        Self {
            schwab_user_id: Some(schwab_user_id.into()),
            client_id: None,
        }
    }

    pub fn client(client_id: impl Into<String>) -> Self {
        Self {
            schwab_user_id: None,
            client_id: Some(client_id.into()),
        }
    }

    /// The user id wins over the client id
    fn identity(&self) -> Option<&str> {
        self.schwab_user_id
            .as_deref()
            .or(self.client_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Token set as issued by the OAuth token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token expiry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// Token store backed by redb
pub struct RedbTokenStore<T> {
    db: Arc<Database>,
    ttl: Duration,
    refresh_ttl: Duration,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for RedbTokenStore<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            ttl: self.ttl,
            refresh_ttl: self.refresh_ttl,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> RedbTokenStore<T> {
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create token store directory")?;
        }

        let db = Database::create(&path).context("Failed to create redb database")?;

        let write_txn = db.begin_write().context("Failed to begin write transaction")?;
        {
            let _tokens_table = write_txn
                .open_table(TOKENS_TABLE)
                .context("Failed to open tokens table")?;
        }
        write_txn.commit().context("Failed to commit transaction")?;

        Ok(Self {
            db: Arc::new(db),
            ttl: Duration::seconds(TOKEN_TTL_SECS),
            refresh_ttl: Duration::seconds(REFRESH_TOKEN_TTL_SECS),
            _marker: PhantomData,
        })
    }

    /// Override how long saved entries live
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Storage key for a token
    pub fn kv_key(&self, ids: &TokenIdentifiers) -> Result<String> {
        match ids.identity() {
            Some(id) => Ok(format!("{}{}", TOKEN_KEY_PREFIX, id)),
            None => bail!("Token identifiers need a schwab user id or a client id"),
        }
    }

    fn timestamp_key(&self, ids: &TokenIdentifiers) -> Result<String> {
        Ok(format!("{}{}", TOKEN_TIMESTAMP_KEY_PREFIX, self.kv_key(ids)?))
    }

    pub fn load(&self, ids: &TokenIdentifiers) -> Result<Option<T>> {
        let key = self.kv_key(ids)?;
        match self.get_entry(&key)? {
            Some(entry) => {
                let data = serde_json::from_value(entry.value)
                    .context("Failed to deserialize stored token")?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    pub fn save(&self, ids: &TokenIdentifiers, data: &T) -> Result<()> {
        let key = self.kv_key(ids)?;
        let value = serde_json::to_value(data).context("Failed to serialize token")?;
        self.put_entry(&key, value)
    }

    /// Move a token to a new key. Returns false when there was nothing to
    /// move or the destination already holds a token.
    pub fn migrate(&self, from: &TokenIdentifiers, to: &TokenIdentifiers) -> Result<bool> {
        let from_key = self.kv_key(from)?;
        let to_key = self.kv_key(to)?;

        if from_key == to_key {
            return Ok(false);
        }

        let Some(entry) = self.get_entry(&from_key)? else {
            return Ok(false);
        };
        if self.get_entry(&to_key)?.is_some() {
            return Ok(false);
        }

        let bytes = serde_json::to_vec(&entry).context("Failed to serialize token entry")?;
        let write_txn = self.db.begin_write().context("Failed to begin write")?;
        {
            let mut table = write_txn
                .open_table(TOKENS_TABLE)
                .context("Failed to open table")?;
            table
                .insert(to_key.as_str(), bytes.as_slice())
                .context("Failed to insert token")?;
            table
                .remove(from_key.as_str())
                .context("Failed to remove migrated token")?;
        }
        write_txn.commit().context("Failed to commit")?;

        tracing::info!(from = %from_key, to = %to_key, "Migrated token");
        Ok(true)
    }

    pub fn migrate_if_needed(&self, from: &TokenIdentifiers, to: &TokenIdentifiers) -> Result<()> {
        if !self.migrate(from, to)? {
            tracing::warn!(
                from = %self.kv_key(from)?,
                to = %self.kv_key(to)?,
                "Token migration was not needed or failed"
            );
        }
        Ok(())
    }

    /// Record that the token was saved now
    pub fn save_timestamp(&self, ids: &TokenIdentifiers) -> Result<()> {
        self.save_timestamp_at(ids, Utc::now())
    }

    pub fn save_timestamp_at(&self, ids: &TokenIdentifiers, stored_at: DateTime<Utc>) -> Result<()> {
        let key = self.timestamp_key(ids)?;
        self.put_entry(&key, serde_json::json!(stored_at.timestamp_millis()))
    }

    /// A token is stale when no save time is recorded or it is older than
    /// the refresh token lifetime.
    pub fn is_token_stale(&self, ids: &TokenIdentifiers) -> Result<bool> {
        let key = self.timestamp_key(ids)?;
        let Some(entry) = self.get_entry(&key)? else {
            return Ok(true);
        };

        let Some(stored_at) = entry
            .value
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
        else {
            return Ok(true);
        };

        Ok(Utc::now() - stored_at > self.refresh_ttl)
    }

    /// Remove a token and its timestamp
    pub fn clear_token(&self, ids: &TokenIdentifiers) -> Result<()> {
        let token_key = self.kv_key(ids)?;
        let ts_key = self.timestamp_key(ids)?;

        let write_txn = self.db.begin_write().context("Failed to begin write")?;
        {
            let mut table = write_txn
                .open_table(TOKENS_TABLE)
                .context("Failed to open table")?;
            table
                .remove(token_key.as_str())
                .context("Failed to remove token")?;
            table
                .remove(ts_key.as_str())
                .context("Failed to remove token timestamp")?;
        }
        write_txn.commit().context("Failed to commit")?;

        tracing::info!(token_key = %token_key, "Cleared stale token and timestamp");
        Ok(())
    }

    fn put_entry(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let entry = Entry {
            value,
            expires_at: Utc::now() + self.ttl,
        };
        let bytes = serde_json::to_vec(&entry).context("Failed to serialize token entry")?;

        let write_txn = self.db.begin_write().context("Failed to begin write")?;
        {
            let mut table = write_txn
                .open_table(TOKENS_TABLE)
                .context("Failed to open table")?;
            table
                .insert(key, bytes.as_slice())
                .context("Failed to insert token entry")?;
        }
        write_txn.commit().context("Failed to commit")?;
        Ok(())
    }

    /// Read an entry, dropping it if it has expired
    fn get_entry(&self, key: &str) -> Result<Option<Entry>> {
        let entry = {
            let read_txn = self.db.begin_read().context("Failed to begin read")?;
            let table = read_txn
                .open_table(TOKENS_TABLE)
                .context("Failed to open table")?;

            let value = table.get(key).context("Failed to get token entry")?;
            let entry: Entry = match value {
                Some(guard) => serde_json::from_slice(guard.value())
                    .context("Failed to deserialize token entry")?,
                None => return Ok(None),
            };
            entry
        };

        if entry.expires_at <= Utc::now() {
            tracing::debug!(key = %key, "Dropping expired token entry");
            self.delete_entry(key)?;
            return Ok(None);
        }

        Ok(Some(entry))
    }

    fn delete_entry(&self, key: &str) -> Result<()> {
        let write_txn = self.db.begin_write().context("Failed to begin write")?;
        {
            let mut table = write_txn
                .open_table(TOKENS_TABLE)
                .context("Failed to open table")?;
            table.remove(key).context("Failed to remove token entry")?;
        }
        write_txn.commit().context("Failed to commit")?;
        Ok(())
    }
}
