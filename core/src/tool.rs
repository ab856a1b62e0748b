use std::sync::LazyLock;

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::args::{ArgumentError, normalize};
use crate::error::codes;
use crate::greeting::HelloMcp;
use crate::orders::GetOrderStatus;
use crate::products::SearchProducts;
use crate::weather::GetWeather;

static BUILTIN_TOOLS: LazyLock<ToolRegistry> = LazyLock::new(|| {
    ToolRegistry::new(vec![
        Box::new(HelloMcp),
        Box::new(GetWeather),
        Box::new(SearchProducts),
        Box::new(GetOrderStatus),
    ])
});

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),
    #[error("Failed to serialize tool output: {0}")]
    Output(serde_json::Error),
}

impl ToolError {
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Argument(err) => err.code(),
            ToolError::UnknownTool(_) => codes::UNKNOWN_TOOL,
            ToolError::Output(_) => codes::INTERNAL_ERROR,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ToolError::Argument(err) => err.field(),
            ToolError::UnknownTool(_) => Some("name"),
            ToolError::Output(_) => None,
        }
    }
}

/// One declared input parameter, in the hosting platform's trigger metadata
/// shape (`propertyName` / `propertyType` / `description`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolProperty {
    pub property_name: &'static str,
    pub property_type: &'static str,
    pub description: &'static str,
}

impl ToolProperty {
    pub const fn string(property_name: &'static str, description: &'static str) -> Self {
        Self {
            property_name,
            property_type: "string",
            description,
        }
    }
}

/// Result of a tool call. `Json` keeps both the serialized text (field order
/// as declared) and the parsed value for structured MCP content.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    Json { text: String, value: Value },
}

impl ToolOutput {
    pub fn json<T: Serialize>(payload: &T) -> Result<Self, ToolError> {
        let text = serde_json::to_string(payload).map_err(ToolError::Output)?;
        let value = serde_json::to_value(payload).map_err(ToolError::Output)?;
        Ok(ToolOutput::Json { text, value })
    }

    pub fn text(&self) -> &str {
        match self {
            ToolOutput::Text(text) | ToolOutput::Json { text, .. } => text,
        }
    }

    pub fn structured(&self) -> Option<&Value> {
        match self {
            ToolOutput::Text(_) => None,
            ToolOutput::Json { value, .. } => Some(value),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ToolOutput::Text(_) => "text/plain; charset=utf-8",
            ToolOutput::Json { .. } => "application/json",
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ToolOutput::Text(text) | ToolOutput::Json { text, .. } => text,
        }
    }
}

/// A named, independently invokable operation with a declared parameter list.
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn properties(&self) -> &'static [ToolProperty];

    /// Run the tool against already-normalized arguments.
    fn invoke(&self, args: &Map<String, Value>) -> Result<ToolOutput, ToolError>;

    /// Run the tool against a raw trigger body (nested or flat).
    fn call(&self, raw: &str) -> Result<ToolOutput, ToolError> {
        let args = normalize(raw)?;
        self.invoke(&args)
    }

    /// MCP `inputSchema` derived from the declared properties.
    fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties()
            .iter()
            .map(|prop| {
                (
                    prop.property_name.to_string(),
                    json!({
                        "type": prop.property_type,
                        "description": prop.description
                    }),
                )
            })
            .collect();
        json!({
            "type": "object",
            "properties": properties
        })
    }
}

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(tools: Vec<Box<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// The four mock tools, in declaration order.
    pub fn builtin() -> &'static ToolRegistry {
        &BUILTIN_TOOLS
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| tool.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.iter().map(|tool| tool.as_ref())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn call(&self, name: &str, raw: &str) -> Result<ToolOutput, ToolError> {
        self.lookup(name)?.call(raw)
    }

    pub fn invoke(&self, name: &str, args: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        self.lookup(name)?.invoke(args)
    }

    fn lookup(&self, name: &str) -> Result<&dyn Tool, ToolError> {
        self.get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_lists_tools_in_declaration_order() {
        let names: Vec<_> = ToolRegistry::builtin().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            ["hello_mcp", "get_weather", "search_products", "get_order_status"]
        );
    }

    #[test]
    fn tool_properties_serialize_in_trigger_metadata_shape() {
        let tool = ToolRegistry::builtin().get("search_products").unwrap();
        let value = serde_json::to_value(tool.properties()).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "propertyName": "query",
                    "propertyType": "string",
                    "description": "Search term to find matching products."
                },
                {
                    "propertyName": "max_results",
                    "propertyType": "string",
                    "description": "Maximum number of results to return (default 3, max 5)."
                }
            ])
        );
    }

    #[test]
    fn input_schema_declares_every_property_as_string() {
        let tool = ToolRegistry::builtin().get("get_weather").unwrap();
        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["city"]["type"], "string");

        let hello = ToolRegistry::builtin().get("hello_mcp").unwrap();
        assert_eq!(hello.input_schema()["properties"], json!({}));
    }

    #[test]
    fn unknown_tool_is_reported_by_name() {
        let err = ToolRegistry::builtin()
            .call("get_stock_price", "{}")
            .expect_err("tool does not exist");
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "get_stock_price"));
        assert_eq!(err.code(), codes::UNKNOWN_TOOL);
    }

    #[test]
    fn malformed_body_surfaces_as_argument_error() {
        let err = ToolRegistry::builtin()
            .call("get_weather", "city=london")
            .expect_err("body is not JSON");
        assert_eq!(err.code(), codes::PARSE_ERROR);
    }

    #[test]
    fn identical_calls_produce_identical_output() {
        let registry = ToolRegistry::builtin();
        for (name, body) in [
            ("hello_mcp", "{}"),
            ("get_weather", r#"{"arguments": {"city": "Seattle"}}"#),
            ("search_products", r#"{"query": "desk", "max_results": 2}"#),
            ("get_order_status", r#"{"arguments": {"order_id": "ord-1002"}}"#),
        ] {
            let first = registry.call(name, body).unwrap();
            let second = registry.call(name, body).unwrap();
            assert_eq!(first.text(), second.text(), "{name} must be deterministic");
        }
    }
}
