//! API namespaces.
//!
//! `client.trader()` groups the Trader API (accounts, orders, transactions,
//! user preference); `client.market_data()` groups the Market Data API.

pub mod accounts;
pub mod instruments;
pub mod market_hours;
pub mod movers;
pub mod options;
pub mod orders;
pub mod price_history;
pub mod quotes;
pub mod transactions;
pub mod user_preference;

pub use accounts::*;
pub use instruments::*;
pub use market_hours::*;
pub use movers::*;
pub use options::*;
pub use orders::*;
pub use price_history::*;
pub use quotes::*;
pub use transactions::*;
pub use user_preference::*;

use crate::client::SchwabClient;

/// Trader API namespace.
pub struct TraderApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> TraderApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    pub fn accounts(&self) -> AccountsApi<'a> {
        AccountsApi::new(self.client)
    }

    pub fn orders(&self) -> OrdersApi<'a> {
        OrdersApi::new(self.client)
    }

    pub fn transactions(&self) -> TransactionsApi<'a> {
        TransactionsApi::new(self.client)
    }

    pub fn user_preference(&self) -> UserPreferenceApi<'a> {
        UserPreferenceApi::new(self.client)
    }
}

/// Market Data API namespace.
pub struct MarketDataApi<'a> {
    client: &'a SchwabClient,
}

impl<'a> MarketDataApi<'a> {
    pub(crate) fn new(client: &'a SchwabClient) -> Self {
        Self { client }
    }

    pub fn quotes(&self) -> QuotesApi<'a> {
        QuotesApi::new(self.client)
    }

    pub fn price_history(&self) -> PriceHistoryApi<'a> {
        PriceHistoryApi::new(self.client)
    }

    pub fn options(&self) -> OptionsApi<'a> {
        OptionsApi::new(self.client)
    }

    pub fn instruments(&self) -> InstrumentsApi<'a> {
        InstrumentsApi::new(self.client)
    }

    pub fn market_hours(&self) -> MarketHoursApi<'a> {
        MarketHoursApi::new(self.client)
    }

    pub fn movers(&self) -> MoversApi<'a> {
        MoversApi::new(self.client)
    }
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}
