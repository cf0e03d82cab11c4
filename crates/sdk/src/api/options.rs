//! Option chain API endpoints.

use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::{ChainStrategy, ContractType, Entitlement, ExpirationMonth, StrikeRange};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option chain API.
pub struct OptionsApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> OptionsApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Full option chain. Responses can run to several megabytes.
    pub async fn get_option_chain(&self, params: &GetOptionChainParams) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query("/marketdata/v1/chains", params)
            .await
    }

    pub async fn get_expiration_chain(
        &self,
        params: &GetOptionExpirationChainParams,
    ) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query("/marketdata/v1/expirationchain", params)
            .await
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOptionChainParams {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<ContractType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_underlying_quote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ChainStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<StrikeRange>,
    /// `yyyy-MM-dd`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_date: Option<String>,
    /// `yyyy-MM-dd`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<ExpirationMonth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entitlement: Option<Entitlement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOptionExpirationChainParams {
    pub symbol: String,
}
