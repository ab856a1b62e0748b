use serde_json::{Map, Value};

use crate::tool::{Tool, ToolError, ToolOutput, ToolProperty};

pub const GREETING: &str = "Hello from the mocktools MCP server!";

/// Connectivity check. Takes no arguments and ignores the request body.
pub struct HelloMcp;

impl Tool for HelloMcp {
    fn name(&self) -> &'static str {
        "hello_mcp"
    }

    fn description(&self) -> &'static str {
        "Returns a simple greeting. Use this to verify the MCP server is reachable."
    }

    fn properties(&self) -> &'static [ToolProperty] {
        &[]
    }

    fn invoke(&self, _args: &Map<String, Value>) -> Result<ToolOutput, ToolError> {
        tracing::info!("hello_mcp triggered");
        Ok(ToolOutput::Text(GREETING.to_string()))
    }

    fn call(&self, _raw: &str) -> Result<ToolOutput, ToolError> {
        self.invoke(&Map::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_is_plain_text_for_any_body() {
        for body in ["", "{}", "not json", r#"{"arguments": {"x": 1}}"#] {
            let output = HelloMcp.call(body).unwrap();
            assert_eq!(output, ToolOutput::Text(GREETING.to_string()));
            assert!(output.structured().is_none());
        }
    }
}
