//! Price history API endpoint.

use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::{FrequencyType, PeriodType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Price history API.
pub struct PriceHistoryApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> PriceHistoryApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    pub async fn get_price_history(
        &self,
        params: &GetPriceHistoryParams,
    ) -> SchwabResult<PriceHistory> {
        self.client
            .http
            .get_with_query("/marketdata/v1/pricehistory", params)
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPriceHistoryParams {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_type: Option<PeriodType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_type: Option<FrequencyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<i64>,
    /// Epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_extended_hours_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_previous_close: Option<bool>,
}

/// Candle list. Unknown fields are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candles: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PriceHistory {
    pub fn candle_count(&self) -> usize {
        self.candles.as_ref().map_or(0, Vec::len)
    }
}
