mod config;
mod errors;
mod images;
mod llm_client;
mod models;
mod posts;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::images::orchestrator::FallbackOrchestrator;
use crate::llm_client::LlmClient;
use crate::posts::session::{spawn_idle_sweeper, SessionStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Postgen API v{}", env!("CARGO_PKG_VERSION"));

    let missing = config.missing_credentials();
    if !missing.is_empty() {
        // Providers without a key fail fast and the chain moves on.
        warn!("Missing credentials (those providers will be skipped): {missing:?}");
    }

    let llm = LlmClient::new(
        config.open_router_url.clone(),
        config.open_router_api_key.clone(),
        config.provider_timeout,
    );
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let images = FallbackOrchestrator::from_config(&config);
    info!("Image provider chain: {:?}", images.provider_labels());

    let sessions = Arc::new(SessionStore::new());
    spawn_idle_sweeper(
        sessions.clone(),
        config.session_idle_ttl,
        config.session_sweep_interval,
    );
    info!(
        "Session idle TTL: {}s (sweep every {}s)",
        config.session_idle_ttl.as_secs(),
        config.session_sweep_interval.as_secs()
    );

    let state = AppState {
        config: config.clone(),
        text: Arc::new(llm),
        images: Arc::new(images),
        sessions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
