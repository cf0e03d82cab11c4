// Core building blocks for the Schwab MCP server: tool selection, argument
// alias normalization, response transforms and token persistence.

pub mod aliases;
pub mod scrub;
pub mod slim;
pub mod token_store;
pub mod tool_config;

pub use scrub::{scrub_account_identifiers, AccountDisplayMap};
pub use slim::slim_option_chain;
pub use token_store::{RedbTokenStore, StoredTokens, TokenIdentifiers};
pub use tool_config::{
    filter_tool_specs, parse_enabled_tools, EnabledToolSet, Named, ToolName, CORE_TOOLS,
    EXTENDED_TOOLS,
};
