use clap::{Args, Subcommand};
use mocktools_core::{ToolOutput, ToolRegistry};
use serde_json::{Map, Value, json};
use tokio::io::{self, AsyncBufRead, AsyncWrite, BufReader};

mod framing;

use framing::{read_framed_json, write_framed_json};

const MCP_PROTOCOL_VERSION: &str = "2025-03-26";
const MCP_SERVER_NAME: &str = "mocktools-mcp";
const MCP_INSTRUCTIONS: &str = "Call hello_mcp first to verify connectivity. get_weather, search_products and get_order_status answer from static mock data; unknown cities, unmatched searches and unknown order ids return informative payloads rather than errors.";

#[derive(Subcommand)]
pub enum McpCommands {
    /// Run the MCP server over stdio
    Serve(McpServeArgs),
    /// Print tool metadata (name, description, declared properties)
    Tools,
    /// Invoke one tool directly with a raw trigger body
    Call(McpCallArgs),
}

#[derive(Args, Clone, Debug)]
pub struct McpServeArgs {
    /// Server name reported in the initialize handshake
    #[arg(long, env = "MOCKTOOLS_MCP_SERVER_NAME", default_value = MCP_SERVER_NAME)]
    pub server_name: String,
}

#[derive(Args, Clone, Debug)]
pub struct McpCallArgs {
    /// Tool name (e.g. get_weather)
    pub tool: String,
    /// Trigger body, either {"arguments": {...}} or a flat object
    #[arg(long, env = "MOCKTOOLS_MCP_BODY", default_value = "{}")]
    pub body: String,
}

pub async fn run(command: McpCommands) -> i32 {
    match command {
        McpCommands::Serve(args) => {
            let server = McpServer::new(McpRuntimeConfig {
                server_name: args.server_name,
            });
            match server.serve_stdio().await {
                Ok(()) => 0,
                Err(err) => {
                    tracing::error!(error = %err, "mcp stdio server stopped");
                    let payload = json!({
                        "error": "mcp_server_error",
                        "message": err,
                    });
                    eprintln!("{}", to_pretty_json(&payload));
                    1
                }
            }
        }
        McpCommands::Tools => {
            println!("{}", to_pretty_json(&tool_metadata()));
            0
        }
        McpCommands::Call(args) => match ToolRegistry::builtin().call(&args.tool, &args.body) {
            Ok(output) => {
                println!("{}", output.into_text());
                0
            }
            Err(err) => {
                eprintln!("{}", to_pretty_json(&ToolError::from(err).to_value()));
                1
            }
        },
    }
}

/// Tool metadata in the hosting platform's trigger registration shape.
pub fn tool_metadata() -> Value {
    let tools: Vec<Value> = ToolRegistry::builtin()
        .iter()
        .map(|tool| {
            json!({
                "toolName": tool.name(),
                "description": tool.description(),
                "toolProperties": tool.properties(),
            })
        })
        .collect();
    Value::Array(tools)
}

#[derive(Clone, Debug)]
pub struct HttpMcpRequestConfig {
    pub server_name: String,
}

impl Default for HttpMcpRequestConfig {
    fn default() -> Self {
        Self {
            server_name: MCP_SERVER_NAME.to_string(),
        }
    }
}

/// Handle one Streamable-HTTP POST body. Returns the responses to send back;
/// an empty vec means the body held only notifications.
pub fn handle_http_jsonrpc(config: HttpMcpRequestConfig, incoming: Value) -> Vec<Value> {
    let server = McpServer::new(McpRuntimeConfig {
        server_name: config.server_name,
    });
    server.handle_incoming_message(incoming)
}

/// JSON-RPC response for a body that is not valid JSON.
pub fn parse_error_response() -> Value {
    error_response(Value::Null, RpcError::parse_error())
}

#[derive(Clone, Debug)]
struct McpRuntimeConfig {
    server_name: String,
}

struct McpServer {
    config: McpRuntimeConfig,
    tools: &'static ToolRegistry,
}

impl McpServer {
    fn new(config: McpRuntimeConfig) -> Self {
        Self {
            config,
            tools: ToolRegistry::builtin(),
        }
    }

    async fn serve_stdio(&self) -> Result<(), String> {
        tracing::info!(
            server = %self.config.server_name,
            version = env!("CARGO_PKG_VERSION"),
            tools = self.tools.len(),
            "mcp stdio server ready"
        );
        let mut reader = BufReader::new(io::stdin());
        let mut stdout = io::stdout();
        self.serve(&mut reader, &mut stdout).await
    }

    async fn serve<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<(), String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let frame = read_framed_json(reader)
                .await
                .map_err(|e| format!("Failed to read MCP message: {e}"))?;
            let Some((payload, framing)) = frame else {
                break;
            };

            let responses = match payload {
                Ok(incoming) => self.handle_incoming_message(incoming),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding malformed MCP message");
                    vec![parse_error_response()]
                }
            };
            for response in responses {
                write_framed_json(writer, &response, framing)
                    .await
                    .map_err(|e| format!("Failed to write MCP response: {e}"))?;
            }
        }

        Ok(())
    }

    fn handle_incoming_message(&self, incoming: Value) -> Vec<Value> {
        let mut responses = Vec::new();

        if let Some(batch) = incoming.as_array() {
            if batch.is_empty() {
                responses.push(error_response(
                    Value::Null,
                    RpcError::invalid_request("Batch request must not be empty"),
                ));
                return responses;
            }
            for item in batch {
                if let Some(response) = self.handle_single_message(item.clone()) {
                    responses.push(response);
                }
            }
            return responses;
        }

        if let Some(response) = self.handle_single_message(incoming) {
            responses.push(response);
        }
        responses
    }

    fn handle_single_message(&self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            // Most likely a client response; server does not issue outbound requests.
            return None;
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        if let Some(id) = obj.get("id").cloned() {
            Some(match self.handle_request(method, params) {
                Ok(payload) => success_response(id, payload),
                Err(err) => error_response(id, err),
            })
        } else {
            self.handle_notification(method);
            None
        }
    }

    fn handle_notification(&self, method: &str) {
        if !matches!(
            method,
            "notifications/initialized" | "notifications/cancelled"
        ) {
            tracing::debug!(method, "ignoring unknown notification");
        }
    }

    fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.handle_tools_call(params),
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": self.config.server_name,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": MCP_INSTRUCTIONS
        })
    }

    fn tools_list_payload(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.input_schema(),
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    fn handle_tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let args = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ));
            }
        };

        tracing::debug!(tool = name, "tools/call");
        Ok(match self.tools.invoke(name, &args) {
            Ok(output) => build_tool_call_response(output),
            Err(err) => {
                tracing::warn!(tool = name, error = %err, "tool call failed");
                build_tool_error_response(name, ToolError::from(err))
            }
        })
    }
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn parse_error() -> Self {
        Self {
            code: -32700,
            message: "Parse error".to_string(),
        }
    }

    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct ToolError {
    code: String,
    message: String,
    field: Option<String>,
    docs_hint: Option<String>,
}

impl ToolError {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            docs_hint: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn with_docs_hint(mut self, docs_hint: impl Into<String>) -> Self {
        self.docs_hint = Some(docs_hint.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut payload = json!({
            "error": self.code,
            "message": self.message
        });
        if let Some(field) = &self.field {
            payload["field"] = Value::String(field.clone());
        }
        if let Some(docs_hint) = &self.docs_hint {
            payload["docs_hint"] = Value::String(docs_hint.clone());
        }
        payload
    }
}

impl From<mocktools_core::ToolError> for ToolError {
    fn from(err: mocktools_core::ToolError) -> Self {
        let mut tool_error = ToolError::new(err.code(), err.to_string());
        if let Some(field) = err.field() {
            tool_error = tool_error.with_field(field);
        }
        match err {
            mocktools_core::ToolError::UnknownTool(_) => {
                tool_error.with_docs_hint("Call tools/list to see the available tool names.")
            }
            mocktools_core::ToolError::Argument(_) => tool_error.with_docs_hint(
                "Send arguments as {\"arguments\": {...}} or as a flat JSON object of strings.",
            ),
            mocktools_core::ToolError::Output(_) => tool_error,
        }
    }
}

fn build_tool_call_response(output: ToolOutput) -> Value {
    match output {
        ToolOutput::Text(text) => json!({
            "content": [{ "type": "text", "text": text }]
        }),
        ToolOutput::Json { text, value } => json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": value
        }),
    }
}

fn build_tool_error_response(tool_name: &str, err: ToolError) -> Value {
    let envelope = json!({
        "status": "error",
        "tool": tool_name,
        "error": err.to_value()
    });
    json!({
        "isError": true,
        "content": [{ "type": "text", "text": to_pretty_json(&envelope) }],
        "structuredContent": envelope
    })
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message
        }
    })
}

fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn call(request: Value) -> Value {
        let mut responses = handle_http_jsonrpc(HttpMcpRequestConfig::default(), request);
        assert_eq!(responses.len(), 1, "expected exactly one response");
        responses.remove(0)
    }

    fn tools_call(name: &str, arguments: Value) -> Value {
        call(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }))
    }

    #[test]
    fn initialize_reports_server_info_and_tool_capability() {
        let response = call(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {}
        }));
        let result = &response["result"];
        assert_eq!(result["protocolVersion"], MCP_PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "mocktools-mcp");
        assert_eq!(result["capabilities"]["tools"]["listChanged"], false);
        assert!(
            result["instructions"]
                .as_str()
                .is_some_and(|text| text.contains("hello_mcp"))
        );
    }

    #[test]
    fn tools_list_exposes_four_tools_with_schemas() {
        let response = call(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));
        let tools = response["result"]["tools"]
            .as_array()
            .expect("tools/list must return an array");
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert_eq!(
            names,
            ["hello_mcp", "get_weather", "search_products", "get_order_status"]
        );
        let search = &tools[2];
        assert_eq!(
            search["inputSchema"]["properties"]["max_results"]["type"],
            "string"
        );
    }

    #[test]
    fn hello_mcp_returns_plain_text_content() {
        let response = tools_call("hello_mcp", Value::Null);
        let result = &response["result"];
        assert_eq!(
            result["content"][0]["text"],
            mocktools_core::greeting::GREETING
        );
        assert!(result.get("structuredContent").is_none());
        assert!(result.get("isError").is_none());
    }

    #[test]
    fn weather_call_returns_json_text_and_structured_content() {
        let response = tools_call("get_weather", json!({"city": "london"}));
        let result = &response["result"];
        assert_eq!(response["id"], 7);
        assert_eq!(result["structuredContent"]["temperature_f"], 53.6);
        let text = result["content"][0]["text"].as_str().unwrap();
        let reparsed: Value = serde_json::from_str(text).unwrap();
        assert_eq!(reparsed, result["structuredContent"]);
    }

    #[test]
    fn search_call_applies_cap_and_fallback() {
        let response = tools_call("search_products", json!({"query": "zzzznomatch"}));
        let structured = &response["result"]["structuredContent"];
        assert_eq!(structured["returned"], 3);
        assert_eq!(structured["products"][2]["id"], "P003");
    }

    #[test]
    fn unknown_tool_is_a_tool_error_not_an_rpc_error() {
        let response = tools_call("get_stock_price", json!({}));
        assert!(response.get("error").is_none());
        let result = &response["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"]["error"], "unknown_tool");
    }

    #[test]
    fn invalid_argument_type_is_reported_with_field() {
        let response = tools_call("get_order_status", json!({"order_id": ["ORD-1001"]}));
        let error = &response["result"]["structuredContent"]["error"];
        assert_eq!(error["error"], "validation_failed");
        assert_eq!(error["field"], "order_id");
    }

    #[test]
    fn non_object_arguments_are_invalid_params() {
        let response = tools_call("get_weather", json!("london"));
        assert_eq!(response["error"]["code"], -32602);
    }

    #[test]
    fn unknown_method_and_bad_version_are_rpc_errors() {
        let response = call(json!({"jsonrpc": "2.0", "id": 3, "method": "sampling/create"}));
        assert_eq!(response["error"]["code"], -32601);

        let response = call(json!({"jsonrpc": "1.0", "id": 4, "method": "ping"}));
        assert_eq!(response["error"]["code"], -32600);
        assert_eq!(response["id"], 4);
    }

    #[test]
    fn notifications_produce_no_response_and_batches_answer_each_request() {
        let responses = handle_http_jsonrpc(
            HttpMcpRequestConfig::default(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        );
        assert!(responses.is_empty());

        let responses = handle_http_jsonrpc(
            HttpMcpRequestConfig::default(),
            json!([
                {"jsonrpc": "2.0", "method": "notifications/initialized"},
                {"jsonrpc": "2.0", "id": 1, "method": "ping"},
                {"jsonrpc": "2.0", "id": 2, "method": "tools/list"}
            ]),
        );
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"], json!({}));

        let responses = handle_http_jsonrpc(HttpMcpRequestConfig::default(), json!([]));
        assert_eq!(responses[0]["error"]["code"], -32600);
    }

    #[test]
    fn tool_metadata_uses_trigger_property_shape() {
        let metadata = tool_metadata();
        assert_eq!(metadata[0]["toolName"], "hello_mcp");
        assert_eq!(metadata[0]["toolProperties"], json!([]));
        assert_eq!(
            metadata[3]["toolProperties"][0]["propertyName"],
            "order_id"
        );
    }

    #[tokio::test]
    async fn serve_answers_line_delimited_and_framed_messages() {
        let server = McpServer::new(McpRuntimeConfig {
            server_name: "test-server".to_string(),
        });
        let ping = r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#;
        let framed_body = r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"get_order_status","arguments":{"order_id":"ord-1003"}}}"#;
        let input = format!(
            "{ping}\nnot json\nContent-Length: {}\r\n\r\n{framed_body}",
            framed_body.len()
        );

        let mut reader = BufReader::new(input.as_bytes());
        let mut output: Vec<u8> = Vec::new();
        server.serve(&mut reader, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        let mut lines = output.lines();
        let first: Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(first["id"], 1);
        let second: Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(second["error"]["code"], -32700);

        let (_, framed) = output
            .split_once("\r\n\r\n")
            .expect("framed response must carry headers");
        let third: Value = serde_json::from_str(framed).unwrap();
        assert_eq!(third["result"]["structuredContent"]["status"], "Processing");
    }
}
