//! Axum route handler for the image proxy endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::images::orchestrator::ImageOutcome;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

/// POST /api/generate-image
///
/// Walks the provider chain. Total failure is a 500 with `fallback: true`
/// so the client knows to draw its own placeholder.
pub async fn handle_generate_image(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateImageRequest>,
) -> Result<(StatusCode, Json<GenerateImageResponse>), AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }

    let response = match state.images.generate(&request.prompt).await {
        ImageOutcome::Generated(image) => (
            StatusCode::OK,
            GenerateImageResponse {
                success: true,
                image_url: Some(image.url),
                source: Some(image.source_label),
                error: None,
                fallback: None,
            },
        ),
        ImageOutcome::AllProvidersFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            GenerateImageResponse {
                success: false,
                image_url: None,
                source: None,
                error: Some("All image generation services failed".to_string()),
                fallback: Some(true),
            },
        ),
    };

    Ok((response.0, Json(response.1)))
}
