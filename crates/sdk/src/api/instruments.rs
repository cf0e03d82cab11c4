//! Instrument lookup endpoints.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::Projection;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Instruments API.
pub struct InstrumentsApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> InstrumentsApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    pub async fn search(&self, params: &SearchInstrumentsParams) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query("/marketdata/v1/instruments", params)
            .await
    }

    pub async fn get_by_cusip(&self, cusip_id: &str) -> SchwabResult<Value> {
        self.client
            .http
            .get(&format!("/marketdata/v1/instruments/{}", segment(cusip_id)))
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchInstrumentsParams {
    pub symbol: String,
    pub projection: Projection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetInstrumentByCusipParams {
    pub cusip_id: String,
}
