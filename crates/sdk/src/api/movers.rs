//! Movers API endpoint.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::{MoversIndex, MoversSort};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Movers API.
pub struct MoversApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> MoversApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Top movers for an index.
    pub async fn get_movers(&self, params: &GetMoversParams) -> SchwabResult<Value> {
        self.client
            .http
            .get_with_query(
                &format!("/marketdata/v1/movers/{}", segment(params.symbol_id.as_str())),
                &MoversQuery {
                    sort: params.sort,
                    frequency: params.frequency,
                },
            )
            .await
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMoversParams {
    pub symbol_id: MoversIndex,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<MoversSort>,
    /// Minimum percent change, one of 0, 1, 5, 10, 30, 60
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u32>,
}

#[derive(Serialize)]
struct MoversQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    sort: Option<MoversSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency: Option<u32>,
}
