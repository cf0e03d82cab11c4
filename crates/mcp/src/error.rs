//! Tool invocation errors.

use crate::protocol::JsonRpcError;
use schwab_sdk::SchwabError;
use thiserror::Error;

/// Why a tool call did not produce a result.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Arguments did not match the tool's input schema.
    #[error("Invalid arguments for {tool}: {message}")]
    Validation { tool: String, message: String },

    /// The tool is unknown or not enabled.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The brokerage API call failed.
    #[error(transparent)]
    Upstream(#[from] SchwabError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    pub fn validation(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Protocol-level error for failures that never reached the brokerage.
    /// Upstream failures are reported inside the tool result instead.
    pub fn to_rpc_error(&self) -> Option<JsonRpcError> {
        match self {
            Self::Validation { .. } | Self::UnknownTool(_) => {
                Some(JsonRpcError::invalid_params(self.to_string()))
            }
            Self::Serialization(_) => Some(JsonRpcError::internal_error(self.to_string())),
            Self::Upstream(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{INTERNAL_ERROR, INVALID_PARAMS};

    #[test]
    fn test_rpc_error_mapping() {
        let err = ToolError::validation("placeOrder", "unknown variant `XYZ`");
        assert_eq!(err.to_rpc_error().unwrap().code, INVALID_PARAMS);

        let err = ToolError::UnknownTool("getOrder".to_string());
        let rpc = err.to_rpc_error().unwrap();
        assert_eq!(rpc.code, INVALID_PARAMS);
        assert_eq!(rpc.message, "Unknown tool: getOrder");

        let err = ToolError::Upstream(SchwabError::NotFound("order".to_string()));
        assert!(err.to_rpc_error().is_none());

        let err: ToolError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.to_rpc_error().unwrap().code, INTERNAL_ERROR);
    }
}
