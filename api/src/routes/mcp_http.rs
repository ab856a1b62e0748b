use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use super::MCP_BASE_PATH;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(MCP_BASE_PATH, post(mcp_post).get(mcp_get))
}

/// Streamable HTTP clients may probe for an SSE stream; there is none.
async fn mcp_get() -> Response {
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

async fn mcp_post(State(state): State<AppState>, body: Bytes) -> Response {
    let incoming: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::debug!(error = %err, "rejecting unparseable MCP request body");
            return (
                StatusCode::OK,
                Json(mocktools_mcp_runtime::parse_error_response()),
            )
                .into_response();
        }
    };

    let mut responses = mocktools_mcp_runtime::handle_http_jsonrpc(state.mcp.clone(), incoming);

    if responses.is_empty() {
        return StatusCode::ACCEPTED.into_response();
    }

    if responses.len() == 1 {
        return (StatusCode::OK, Json(responses.swap_remove(0))).into_response();
    }

    (StatusCode::OK, Json(Value::Array(responses))).into_response()
}
