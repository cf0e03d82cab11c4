//! Accounts API endpoints.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Accounts API.
pub struct AccountsApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> AccountsApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Plain account numbers paired with the hashes the other endpoints expect.
    pub async fn get_account_numbers(&self) -> SchwabResult<Vec<AccountNumberHash>> {
        self.client
            .http
            .get("/trader/v1/accounts/accountNumbers")
            .await
    }

    /// Balances (and positions with `fields=positions`) for every linked account.
    pub async fn get_accounts(&self, params: &GetAccountsParams) -> SchwabResult<Vec<Value>> {
        self.client
            .http
            .get_with_query("/trader/v1/accounts", params)
            .await
    }

    /// A single account by its hash.
    pub async fn get_account(&self, params: &GetAccountParams) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query(
                &format!("/trader/v1/accounts/{}", segment(&params.account_number)),
                &FieldsQuery {
                    fields: params.fields.as_deref(),
                },
            )
            .await
    }
}

/// Account number and its encrypted hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountNumberHash {
    pub account_number: String,
    pub hash_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAccountsParams {
    /// `positions` to include positions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountParams {
    /// Account hash from getAccountNumbers
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Serialize)]
struct FieldsQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a str>,
}
