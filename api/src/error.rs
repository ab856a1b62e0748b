use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mocktools_core::ToolError;
use mocktools_core::error::{self, ApiError};

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Malformed trigger body or argument of the wrong type (400)
    Validation {
        code: &'static str,
        message: String,
        field: Option<String>,
        docs_hint: Option<String>,
    },
    /// No tool registered under this name (404)
    UnknownTool { name: String },
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                code,
                message,
                field,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: code.to_string(),
                    message,
                    field,
                    received: None,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::UnknownTool { name } => (
                StatusCode::NOT_FOUND,
                ApiError {
                    error: error::codes::UNKNOWN_TOOL.to_string(),
                    message: format!("Unknown tool '{name}'"),
                    field: Some("name".to_string()),
                    received: Some(serde_json::Value::String(name)),
                    request_id,
                    docs_hint: Some(
                        "GET /runtime/webhooks/mcp/tools lists the available tool names."
                            .to_string(),
                    ),
                },
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::INTERNAL_ERROR.to_string(),
                        message: "An internal error occurred".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

impl From<ToolError> for AppError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Argument(arg_err) => AppError::Validation {
                code: arg_err.code(),
                message: arg_err.to_string(),
                field: arg_err.field().map(str::to_string),
                docs_hint: Some(
                    "Send {\"arguments\": {...}} or a flat JSON object of string arguments."
                        .to_string(),
                ),
            },
            ToolError::UnknownTool(name) => AppError::UnknownTool { name },
            ToolError::Output(err) => AppError::Internal(err.to_string()),
        }
    }
}
