//! Market hours API endpoints.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::Market;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Market hours API.
pub struct MarketHoursApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> MarketHoursApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Hours for several markets. `markets` is comma-separated.
    pub async fn get_market_hours(&self, markets: &str, date: Option<&str>) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query(
                "/marketdata/v1/markets",
                &HoursQuery {
                    markets: Some(markets),
                    date,
                },
            )
            .await
    }

    pub async fn get_market_hours_by_id(
        &self,
        market: Market,
        date: Option<&str>,
    ) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query(
                &format!("/marketdata/v1/markets/{}", segment(market.as_str())),
                &HoursQuery {
                    markets: None,
                    date,
                },
            )
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMarketHoursParams {
    pub markets: Vec<Market>,
    /// Any date or date-time; sent as `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl GetMarketHoursParams {
    pub fn markets_csv(&self) -> String {
        self.markets
            .iter()
            .map(Market::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMarketHoursByMarketIdParams {
    pub market_id: Market,
    /// `YYYY-MM-DD`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Reduce a date or RFC 3339 date-time to the `YYYY-MM-DD` form the API accepts.
pub fn normalize_market_date(value: &str) -> Option<String> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d").to_string())
}

#[derive(Serialize)]
struct HoursQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    markets: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
}
