//! Transport layer for the Schwab SDK.

pub mod http;

pub use http::HttpTransport;
