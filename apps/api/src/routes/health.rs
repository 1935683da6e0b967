use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, and which providers lack credentials.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "postgen-api",
        "image_providers": state.images.provider_labels(),
        "missing_credentials": state.config.missing_credentials(),
    }))
}
