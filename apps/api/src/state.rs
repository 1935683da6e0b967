use std::sync::Arc;

use crate::config::Config;
use crate::images::orchestrator::FallbackOrchestrator;
use crate::llm_client::TextGenerator;
use crate::posts::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Text model behind a trait so handlers can be exercised without OpenRouter.
    pub text: Arc<dyn TextGenerator>,
    /// Image provider chain: AI Horde → Clipdrop → Stability AI.
    pub images: Arc<FallbackOrchestrator>,
    pub sessions: Arc<SessionStore>,
}
