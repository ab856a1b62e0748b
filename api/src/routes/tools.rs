use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use mocktools_core::error::codes;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/runtime/webhooks/mcp/tools", get(list_tools))
        .route("/runtime/webhooks/mcp/tools/{name}", post(invoke_tool))
}

/// Registered tools with their declared properties
#[utoipa::path(
    get,
    path = "/runtime/webhooks/mcp/tools",
    responses(
        (status = 200, description = "Tool metadata in registration order", body = Value)
    ),
    tag = "tools"
)]
pub async fn list_tools() -> Json<Value> {
    Json(mocktools_mcp_runtime::tool_metadata())
}

/// Invoke one tool with a raw trigger body.
///
/// The body is either `{"arguments": {...}}` or a flat object of arguments.
/// `hello_mcp` returns plain text, the other tools return JSON.
#[utoipa::path(
    post,
    path = "/runtime/webhooks/mcp/tools/{name}",
    params(
        ("name" = String, Path, description = "Tool name, e.g. get_weather")
    ),
    request_body(content = String, description = "Trigger body (UTF-8 JSON)", content_type = "application/json"),
    responses(
        (status = 200, description = "Tool output"),
        (status = 400, description = "Body is not a JSON object or an argument has the wrong type", body = mocktools_core::error::ApiError),
        (status = 404, description = "No tool with that name", body = mocktools_core::error::ApiError)
    ),
    tag = "tools"
)]
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let body = std::str::from_utf8(&body).map_err(|err| AppError::Validation {
        code: codes::PARSE_ERROR,
        message: format!("Request body is not valid UTF-8: {err}"),
        field: None,
        docs_hint: Some("Send the trigger body as UTF-8 encoded JSON.".to_string()),
    })?;
    let output = state.tools.call(&name, body)?;
    tracing::debug!(tool = %name, "tool invoked over HTTP");
    let content_type = output.content_type();
    Ok(([(CONTENT_TYPE, content_type)], output.into_text()).into_response())
}
