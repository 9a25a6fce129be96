use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as `{ "error": "<message>" }`, which is the shape the
/// session controller reads back.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream LLM failure. `public` is what the caller sees, `detail` is logged.
    #[error("LLM error: {detail}")]
    Llm { public: String, detail: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Llm { public, detail } => {
                tracing::error!("LLM error: {detail}");
                (StatusCode::INTERNAL_SERVER_ERROR, public)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
