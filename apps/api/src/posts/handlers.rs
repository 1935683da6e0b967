//! Axum route handlers for post text generation and sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::llm_client::Completion;
use crate::models::post::HistoryEntry;
use crate::posts::composer::{ComposeRequest, ComposedPost, Composer};
use crate::posts::session::SessionSummary;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GeneratePostRequest {
    #[serde(default)]
    pub prompt: String,
}

/// POST /api/generate-post
///
/// Thin proxy to the text model: `{prompt}` in, `{content, usage}` out.
pub async fn handle_generate_post(
    State(state): State<AppState>,
    AppJson(request): AppJson<GeneratePostRequest>,
) -> Result<Json<Completion>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("Prompt is required".to_string()));
    }

    let completion = state
        .text
        .complete(&request.prompt)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(completion))
}

/// POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSummary>) {
    (StatusCode::CREATED, Json(state.sessions.create().await))
}

/// GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionSummary>, AppError> {
    Ok(Json(state.sessions.summary(session_id).await?))
}

/// DELETE /api/sessions/:id
///
/// Ends the session; its counter and history are dropped.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/:id/history
pub async fn handle_session_history(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    Ok(Json(state.sessions.history(session_id).await?))
}

/// POST /api/sessions/:id/posts
///
/// Full composition flow. Always returns a complete post unless the topic
/// is missing, the session is unknown, or the free quota is used up.
pub async fn handle_compose_post(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    AppJson(request): AppJson<ComposeRequest>,
) -> Result<Json<ComposedPost>, AppError> {
    let composer = Composer {
        sessions: &state.sessions,
        text: state.text.as_ref(),
        images: &state.images,
    };

    let composed = composer.compose(session_id, request, Local::now()).await?;

    Ok(Json(composed))
}
