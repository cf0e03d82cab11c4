//! User preference API endpoint.

use crate::client::SchwabClient;
use crate::error::SchwabResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User preference API.
pub struct UserPreferenceApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> UserPreferenceApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> SchwabResult<UserPreference> {
        self.client.http.get("/trader/v1/userPreference").await
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<Vec<UserPreferenceAccount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streamer_info: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offers: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UserPreference {
    pub fn accounts(&self) -> &[UserPreferenceAccount] {
        self.accounts.as_deref().unwrap_or_default()
    }

    pub fn has_streamer_info(&self) -> bool {
        self.streamer_info.as_ref().is_some_and(|info| !info.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferenceAccount {
    #[serde(default)]
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_account: Option<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_color: Option<String>,
    /// Already masked by the API, e.g. `...123`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_acct_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_position_effect: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
