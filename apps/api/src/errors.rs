use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Bodies use the flat `{"error": "..."}` shape the browser client expects
/// from both proxy endpoints.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Free generation limit of {limit} reached; log in to continue")]
    QuotaExceeded { limit: u32 },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("LLM error: {0}")]
    Llm(String),

    /// Body was not valid JSON for the endpoint, or had the wrong content type.
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Not implemented")]
    NotImplemented,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::QuotaExceeded { .. } => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
            AppError::NotImplemented => (
                StatusCode::NOT_IMPLEMENTED,
                "This endpoint is not yet implemented".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// `Json` extractor whose rejections use the `{"error": ...}` body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
