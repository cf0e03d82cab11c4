//! Transactions API endpoints.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::{string_or_number, TransactionType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Transactions API.
pub struct TransactionsApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> TransactionsApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Transactions for one account hash.
    pub async fn get_transactions(
        &self,
        account_number: &str,
        query: &TransactionQuery,
    ) -> SchwabResult<Vec<Value>> {
        self.client
            .http
            .get_with_query(
                &format!("/trader/v1/accounts/{}/transactions", segment(account_number)),
                query,
            )
            .await
    }

    pub async fn get_transaction(
        &self,
        account_number: &str,
        transaction_id: &str,
    ) -> SchwabResult<Value> {
        self.client
            .http
            .get(&format!(
                "/trader/v1/accounts/{}/transactions/{}",
                segment(account_number),
                segment(transaction_id)
            ))
            .await
    }
}

/// Filters for transaction listings. Also the arguments of getTransactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// ISO-8601 timestamp
    pub start_date: String,
    /// ISO-8601 timestamp
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Arguments of getTransaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionParams {
    pub account_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub transaction_id: String,
}
