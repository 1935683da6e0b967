//! Fallback Orchestrator: walks the provider chain until one succeeds.
//!
//! Attempts are strictly sequential so each free-tier provider sees at most
//! one request per image. Provider errors are logged and recorded; they
//! never reach the caller.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::images::clipdrop::Clipdrop;
use crate::images::horde::AiHorde;
use crate::images::poll::PollSettings;
use crate::images::provider::{ImageProvider, ImageResult, ProviderError};
use crate::images::stability::StabilityAi;

/// One failed attempt, kept for the log and the failure response.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderFailure {
    pub provider: &'static str,
    pub reason: String,
}

/// Outcome of a full pass over the chain.
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Generated(ImageResult),
    AllProvidersFailed { failures: Vec<ProviderFailure> },
}

pub struct FallbackOrchestrator {
    providers: Vec<Arc<dyn ImageProvider>>,
}

impl FallbackOrchestrator {
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>) -> Self {
        Self { providers }
    }

    /// The production chain: AI Horde, then Clipdrop, then Stability AI.
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.provider_timeout;
        let providers: Vec<Arc<dyn ImageProvider>> = vec![
            Arc::new(AiHorde::new(
                config.ai_horde_url.clone(),
                config.ai_horde_api_key.clone(),
                timeout,
                PollSettings::default(),
            )),
            Arc::new(Clipdrop::new(
                config.clipdrop_url.clone(),
                config.clipdrop_api_key.clone(),
                timeout,
            )),
            Arc::new(StabilityAi::new(
                config.stability_ai_url.clone(),
                config.stability_ai_api_key.clone(),
                timeout,
            )),
        ];
        Self::new(providers)
    }

    pub fn provider_labels(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.label()).collect()
    }

    pub async fn generate(&self, prompt: &str) -> ImageOutcome {
        let mut failures = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            info!("Trying {} for image generation", provider.label());
            let error = match provider.generate(prompt).await {
                Ok(result) if result.is_well_formed() => {
                    info!("{} produced an image", provider.label());
                    return ImageOutcome::Generated(result);
                }
                Ok(_) => ProviderError::MalformedResponse("empty image url".to_string()),
                Err(e) => e,
            };
            warn!("{} failed: {error}", provider.label());
            failures.push(ProviderFailure {
                provider: provider.label(),
                reason: error.to_string(),
            });
        }

        warn!("All image generation services failed");
        ImageOutcome::AllProvidersFailed { failures }
    }
}
