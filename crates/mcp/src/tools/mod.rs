pub mod market;
pub mod trader;
mod registry;

pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_enum, json_schema_integer,
    json_schema_number, json_schema_object, json_schema_string, NoParams, ToolFuture,
    ToolRegistry, ToolSpec,
};

/// Every tool, trader tools first.
pub fn all_tool_specs() -> Vec<ToolSpec> {
    let mut specs = trader::tool_specs();
    specs.extend(market::tool_specs());
    specs
}
