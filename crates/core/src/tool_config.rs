// Tool configuration: which tools are exposed to the agent.
//
// Core tools are enabled by default. Extended tools are opt-in through the
// ENABLED_TOOLS setting to keep the tool list (and the agent's context) small.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Every tool the server knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToolName {
    // Core
    #[serde(rename = "getAccounts")]
    GetAccounts,
    #[serde(rename = "getAccount")]
    GetAccount,
    #[serde(rename = "getQuotes")]
    GetQuotes,
    #[serde(rename = "getPriceHistory")]
    GetPriceHistory,
    #[serde(rename = "getOptionChain")]
    GetOptionChain,
    #[serde(rename = "placeOrder")]
    PlaceOrder,
    #[serde(rename = "getOrders")]
    GetOrders,
    #[serde(rename = "cancelOrder")]
    CancelOrder,

    // Extended
    #[serde(rename = "getAccountNumbers")]
    GetAccountNumbers,
    #[serde(rename = "getUserPreference")]
    GetUserPreference,
    #[serde(rename = "getOrdersByAccountNumber")]
    GetOrdersByAccountNumber,
    #[serde(rename = "getOrder")]
    GetOrder,
    #[serde(rename = "replaceOrder")]
    ReplaceOrder,
    #[serde(rename = "getTransactions")]
    GetTransactions,
    #[serde(rename = "getTransaction")]
    GetTransaction,
    #[serde(rename = "getQuoteBySymbolId")]
    GetQuoteBySymbolId,
    #[serde(rename = "searchInstruments")]
    SearchInstruments,
    #[serde(rename = "getInstrumentByCusip")]
    GetInstrumentByCusip,
    #[serde(rename = "getMarketHours")]
    GetMarketHours,
    #[serde(rename = "getMarketHoursByMarketId")]
    GetMarketHoursByMarketId,
    #[serde(rename = "getMovers")]
    GetMovers,
    #[serde(rename = "getOptionExpirationChain")]
    GetOptionExpirationChain,
}

/// Tools enabled by default (frequently used)
pub const CORE_TOOLS: [ToolName; 8] = [
    ToolName::GetAccounts,
    ToolName::GetAccount,
    ToolName::GetQuotes,
    ToolName::GetPriceHistory,
    ToolName::GetOptionChain,
    ToolName::PlaceOrder,
    ToolName::GetOrders,
    ToolName::CancelOrder,
];

/// Tools disabled by default (less frequently used)
pub const EXTENDED_TOOLS: [ToolName; 14] = [
    ToolName::GetAccountNumbers,
    ToolName::GetUserPreference,
    ToolName::GetOrdersByAccountNumber,
    ToolName::GetOrder,
    ToolName::ReplaceOrder,
    ToolName::GetTransactions,
    ToolName::GetTransaction,
    ToolName::GetQuoteBySymbolId,
    ToolName::SearchInstruments,
    ToolName::GetInstrumentByCusip,
    ToolName::GetMarketHours,
    ToolName::GetMarketHoursByMarketId,
    ToolName::GetMovers,
    ToolName::GetOptionExpirationChain,
];

impl ToolName {
    /// Wire name of the tool
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetAccounts => "getAccounts",
            Self::GetAccount => "getAccount",
            Self::GetQuotes => "getQuotes",
            Self::GetPriceHistory => "getPriceHistory",
            Self::GetOptionChain => "getOptionChain",
            Self::PlaceOrder => "placeOrder",
            Self::GetOrders => "getOrders",
            Self::CancelOrder => "cancelOrder",
            Self::GetAccountNumbers => "getAccountNumbers",
            Self::GetUserPreference => "getUserPreference",
            Self::GetOrdersByAccountNumber => "getOrdersByAccountNumber",
            Self::GetOrder => "getOrder",
            Self::ReplaceOrder => "replaceOrder",
            Self::GetTransactions => "getTransactions",
            Self::GetTransaction => "getTransaction",
            Self::GetQuoteBySymbolId => "getQuoteBySymbolId",
            Self::SearchInstruments => "searchInstruments",
            Self::GetInstrumentByCusip => "getInstrumentByCusip",
            Self::GetMarketHours => "getMarketHours",
            Self::GetMarketHoursByMarketId => "getMarketHoursByMarketId",
            Self::GetMovers => "getMovers",
            Self::GetOptionExpirationChain => "getOptionExpirationChain",
        }
    }

    /// All known tools, core first
    pub fn all() -> impl Iterator<Item = ToolName> {
        CORE_TOOLS.into_iter().chain(EXTENDED_TOOLS)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for ToolName {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// The set of tools exposed to the caller, computed once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledToolSet {
    tools: BTreeSet<ToolName>,
}

impl EnabledToolSet {
    /// Only the core tools
    pub fn core() -> Self {
        Self {
            tools: CORE_TOOLS.into_iter().collect(),
        }
    }

    /// Core and extended tools
    pub fn all() -> Self {
        Self {
            tools: ToolName::all().collect(),
        }
    }

    pub fn contains(&self, tool: ToolName) -> bool {
        self.tools.contains(&tool)
    }

    /// Check a wire name. Unknown names are never enabled.
    pub fn contains_name(&self, name: &str) -> bool {
        name.parse::<ToolName>()
            .map(|tool| self.contains(tool))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ToolName> + '_ {
        self.tools.iter().copied()
    }
}

impl FromIterator<ToolName> for EnabledToolSet {
    fn from_iter<I: IntoIterator<Item = ToolName>>(iter: I) -> Self {
        Self {
            tools: iter.into_iter().collect(),
        }
    }
}

/// Parse the ENABLED_TOOLS setting.
///
/// Accepted forms:
/// - absent, `""` or `"core"`: core tools only
/// - `"all"`: core and extended tools
/// - `"+tool1,-tool2"`: core tools, then each token applied left to right
///   (`+` adds a known tool, `-` removes)
/// - `"tool1,tool2"`: exactly the known tools listed
///
/// Never fails. Unknown names are dropped.
pub fn parse_enabled_tools(value: Option<&str>) -> EnabledToolSet {
    let value = match value {
        None | Some("") | Some("core") => return EnabledToolSet::core(),
        Some("all") => return EnabledToolSet::all(),
        Some(value) => value,
    };

    let parts: Vec<&str> = value.split(',').map(str::trim).collect();

    if parts.iter().all(|p| p.starts_with('+') || p.starts_with('-')) {
        let mut enabled = EnabledToolSet::core();

        for part in parts {
            if let Some(name) = part.strip_prefix('+') {
                if let Ok(tool) = name.parse::<ToolName>() {
                    enabled.tools.insert(tool);
                }
            } else if let Some(name) = part.strip_prefix('-') {
                if let Ok(tool) = name.parse::<ToolName>() {
                    enabled.tools.remove(&tool);
                }
            }
        }

        return enabled;
    }

    parts
        .into_iter()
        .filter_map(|name| name.parse::<ToolName>().ok())
        .collect()
}

/// Anything that carries a tool name
pub trait Named {
    fn name(&self) -> &str;
}

/// Keep the specs whose name is enabled, preserving their order
pub fn filter_tool_specs<T: Named>(specs: Vec<T>, enabled: &EnabledToolSet) -> Vec<T> {
    specs
        .into_iter()
        .filter(|spec| enabled.contains_name(spec.name()))
        .collect()
}
