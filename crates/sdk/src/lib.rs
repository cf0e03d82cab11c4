//! # Schwab SDK
//!
//! Async client for the Schwab Trader and Market Data APIs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schwab_sdk::{SchwabClient, SchwabResult};
//! use schwab_sdk::api::GetQuotesParams;
//!
//! #[tokio::main]
//! async fn main() -> SchwabResult<()> {
//!     let client = SchwabClient::builder()
//!         .access_token("your-oauth-access-token")
//!         .build()?;
//!
//!     let accounts = client.trader().accounts().get_account_numbers().await?;
//!     println!("Found {} accounts", accounts.len());
//!
//!     let quotes = client
//!         .market_data()
//!         .quotes()
//!         .get_quotes(&GetQuotesParams {
//!             symbols: "AAPL,MSFT".to_string(),
//!             fields: None,
//!             indicative: None,
//!         })
//!         .await?;
//!     println!("{quotes}");
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod transport;
pub mod types;

pub use client::{SchwabClient, SchwabClientBuilder};
pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
pub use display::{build_account_display_map, mask_account};
pub use error::{SchwabError, SchwabResult};

pub use schwab_core::AccountDisplayMap;
