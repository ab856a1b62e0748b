use mocktools_core::ToolRegistry;
use mocktools_mcp_runtime::HttpMcpRequestConfig;

#[derive(Clone)]
pub struct AppState {
    pub tools: &'static ToolRegistry,
    pub mcp: HttpMcpRequestConfig,
}

impl AppState {
    pub fn from_env() -> Self {
        let mut mcp = HttpMcpRequestConfig::default();
        if let Ok(name) = std::env::var("MOCKTOOLS_MCP_SERVER_NAME") {
            let trimmed = name.trim();
            if !trimmed.is_empty() {
                mcp.server_name = trimmed.to_string();
            }
        }
        Self {
            tools: ToolRegistry::builtin(),
            mcp,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tools: ToolRegistry::builtin(),
            mcp: HttpMcpRequestConfig::default(),
        }
    }
}
