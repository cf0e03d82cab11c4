// MCP (Model Context Protocol) server exposing the Schwab brokerage API as
// agent tools, plus a stdio bridge to a remote instance

pub mod auth;
pub mod bridge;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use bridge::{Bridge, BridgeConfig, BridgeError};
pub use error::ToolError;
pub use server::McpServer;
pub use tools::{ToolRegistry, ToolSpec};
pub use transport::RequestHandler;
