//! Orders API endpoints.

use super::segment;
use crate::client::SchwabClient;
use crate::error::SchwabResult;
use crate::types::{
    string_or_number, AssetType, ComplexOrderStrategyType, Instruction, OrderDuration,
    OrderStatus, OrderStrategyType, OrderType, Session,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Orders API.
pub struct OrdersApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    /// Orders across all linked accounts.
    pub async fn get_orders(&self, query: &OrderQuery) -> SchwabResult<Vec<Value>> {
        self.client.http.get_with_query("/trader/v1/orders", query).await
    }

    /// Orders for one account.
    pub async fn get_orders_by_account(
        &self,
        account_number: &str,
        query: &OrderQuery,
    ) -> SchwabResult<Vec<Value>> {
        self.client
            .http
            .get_with_query(
                &format!("/trader/v1/accounts/{}/orders", segment(account_number)),
                query,
            )
            .await
    }

    pub async fn get_order(&self, account_number: &str, order_id: &str) -> SchwabResult<Value> {
        self.client
            .http
            .get(&order_path(account_number, order_id))
            .await
    }

    /// Submit a new order.
    pub async fn place_order(
        &self,
        account_number: &str,
        order: &OrderRequest,
    ) -> SchwabResult<OrderPlacement> {
        let location = self
            .client
            .http
            .post_for_location(
                &format!("/trader/v1/accounts/{}/orders", segment(account_number)),
                order,
            )
            .await?;
        Ok(OrderPlacement::from_location(location))
    }

    /// Replace a working order. The API cancels it and creates a new one.
    pub async fn replace_order(
        &self,
        account_number: &str,
        order_id: &str,
        order: &OrderRequest,
    ) -> SchwabResult<OrderPlacement> {
        let location = self
            .client
            .http
            .put_for_location(&order_path(account_number, order_id), order)
            .await?;
        Ok(OrderPlacement::from_location(location))
    }

    pub async fn cancel_order(&self, account_number: &str, order_id: &str) -> SchwabResult<()> {
        self.client
            .http
            .delete_no_response(&order_path(account_number, order_id))
            .await
    }
}

fn order_path(account_number: &str, order_id: &str) -> String {
    format!(
        "/trader/v1/accounts/{}/orders/{}",
        segment(account_number),
        segment(order_id)
    )
}

/// Filters for order listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    /// ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_entered_time: Option<String>,
    /// ISO-8601 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_entered_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    pub fn has_date_filter(&self) -> bool {
        self.from_entered_time.is_some() || self.to_entered_time.is_some()
    }
}

/// Order body for placing or replacing an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub session: Session,
    pub duration: OrderDuration,
    pub order_type: OrderType,
    pub order_strategy_type: OrderStrategyType,
    pub order_leg_collection: Vec<OrderLeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_order_strategy_type: Option<ComplexOrderStrategyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_order_strategies: Option<Vec<OrderRequest>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    pub instruction: Instruction,
    pub quantity: f64,
    pub instrument: OrderInstrument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_leg_type: Option<AssetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_effect: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInstrument {
    pub symbol: String,
    pub asset_type: AssetType,
}

/// Outcome of a place or replace call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPlacement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl OrderPlacement {
    /// The order id is the last path segment of the Location header.
    pub fn from_location(location: Option<String>) -> Self {
        let order_id = location
            .as_deref()
            .and_then(|l| l.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self { order_id, location }
    }
}

/// Arguments of placeOrder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderParams {
    pub account_number: String,
    #[serde(flatten)]
    pub order: OrderRequest,
}

/// Arguments of replaceOrder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOrderParams {
    pub account_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
    #[serde(flatten)]
    pub order: OrderRequest,
}

/// Arguments of getOrder and cancelOrder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderIdParams {
    pub account_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub order_id: String,
}

/// Arguments of getOrdersByAccountNumber.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetOrdersByAccountParams {
    pub account_number: String,
    #[serde(flatten)]
    pub query: OrderQuery,
}
