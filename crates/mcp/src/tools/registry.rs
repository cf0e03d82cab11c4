// Tool specs and the registry of enabled tools

use crate::error::ToolError;
use crate::protocol::ToolSchema;
use futures::future::{self, BoxFuture, FutureExt};
use schwab_core::{filter_tool_specs, EnabledToolSet, Named, ToolName};
use schwab_sdk::SchwabClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub type ToolFuture = BoxFuture<'static, Result<Value, ToolError>>;

type Handler = Arc<dyn Fn(SchwabClient, Value) -> ToolFuture + Send + Sync>;

/// Arguments of tools that take none. Extra keys are ignored.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct NoParams {}

/// One tool: its name, description, input schema and handler.
///
/// Arguments go through an optional total rewrite (`preprocess`), then are
/// deserialized into the handler's typed parameters. A deserialization
/// failure is a validation error and the handler is never run.
#[derive(Clone)]
pub struct ToolSpec {
    pub name: ToolName,
    pub description: String,
    pub input_schema: Value,
    preprocess: Option<fn(Value) -> Value>,
    handler: Handler,
}

impl ToolSpec {
    pub fn new<P, F, Fut>(
        name: ToolName,
        description: impl Into<String>,
        input_schema: Value,
        call: F,
    ) -> Self
    where
        P: DeserializeOwned + Send + 'static,
        F: Fn(SchwabClient, P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |client: SchwabClient, arguments: Value| -> ToolFuture {
            match serde_json::from_value::<P>(arguments) {
                Ok(params) => call(client, params).boxed(),
                Err(e) => {
                    future::ready(Err(ToolError::validation(name.as_str(), e.to_string()))).boxed()
                }
            }
        });

        Self {
            name,
            description: description.into(),
            input_schema,
            preprocess: None,
            handler,
        }
    }

    /// Rewrite raw arguments before validation.
    pub fn with_preprocess(mut self, preprocess: fn(Value) -> Value) -> Self {
        self.preprocess = Some(preprocess);
        self
    }

    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.as_str().to_string(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }

    /// Run the tool. Missing or null arguments count as an empty object.
    pub async fn call(&self, client: &SchwabClient, arguments: Value) -> Result<Value, ToolError> {
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let arguments = match self.preprocess {
            Some(preprocess) => preprocess(arguments),
            None => arguments,
        };
        (self.handler)(client.clone(), arguments).await
    }
}

impl Named for ToolSpec {
    fn name(&self) -> &str {
        self.name.as_str()
    }
}

impl fmt::Debug for ToolSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("preprocess", &self.preprocess.is_some())
            .finish()
    }
}

/// Ordered registry of enabled tools
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Keep only the enabled specs, in the order given.
    pub fn new(specs: Vec<ToolSpec>, enabled: &EnabledToolSet) -> Self {
        Self {
            tools: filter_tool_specs(specs, enabled),
        }
    }

    /// Registry over every trader and market tool.
    pub fn with_enabled(enabled: &EnabledToolSet) -> Self {
        Self::new(super::all_tool_specs(), enabled)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name.as_str() == name)
    }

    /// List all tool schemas
    pub fn list_schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(ToolSpec::schema).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.iter().map(|t| t.name.as_str())
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name. Disabled tools are unknown.
    pub async fn call(
        &self,
        client: &SchwabClient,
        name: &str,
        arguments: Value,
    ) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.call(client, arguments).await
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> Value {
    serde_json::json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_integer(description: &str) -> Value {
    serde_json::json!({
        "type": "integer",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    serde_json::json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    serde_json::json!({
        "type": "array",
        "items": items,
        "description": description
    })
}

pub fn json_schema_enum(values: &[&str], description: &str) -> Value {
    serde_json::json!({
        "type": "string",
        "enum": values,
        "description": description
    })
}
