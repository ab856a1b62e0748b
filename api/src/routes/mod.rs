pub mod health;
pub mod mcp_http;
pub mod tools;

use axum::Router;

use crate::state::AppState;

/// Mount point shared by the MCP endpoint and the direct tool triggers.
pub const MCP_BASE_PATH: &str = "/runtime/webhooks/mcp";

/// All application routes, without the docs UI or outer layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(mcp_http::router())
        .merge(tools::router())
        .with_state(state)
}
