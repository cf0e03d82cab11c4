//! Quotes API endpoints.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Quotes API.
pub struct QuotesApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> QuotesApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Quotes keyed by symbol.
    pub async fn get_quotes(&self, params: &GetQuotesParams) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query("/marketdata/v1/quotes", params)
            .await
    }

    pub async fn get_quote(&self, params: &GetQuoteBySymbolIdParams) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query(
                &format!("/marketdata/v1/{}/quotes", segment(&params.symbol_id)),
                &QuoteFields {
                    fields: params.fields.as_deref(),
                },
            )
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetQuotesParams {
    /// Comma-separated symbols, e.g. `AAPL,MSFT`
    pub symbols: String,
    /// Comma-separated subset of `quote,fundamental,extended,reference,regular`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicative: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetQuoteBySymbolIdParams {
    pub symbol_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
}

#[derive(Serialize)]
struct QuoteFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a str>,
}
