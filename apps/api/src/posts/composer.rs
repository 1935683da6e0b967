//! Post composition: quota → prompt → text → parse-or-demo → image → history.
//!
//! Every upstream failure is absorbed here. The caller always gets a
//! complete post, labelled `Demo Content` and/or with fallback art when the
//! live services did not answer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::images::fallback_art::{self, FALLBACK_LABEL};
use crate::images::orchestrator::{FallbackOrchestrator, ImageOutcome};
use crate::llm_client::TextGenerator;
use crate::models::post::{ContentSource, HistoryEntry, PostImage};
use crate::posts::demo::generate_demo_content;
use crate::posts::parser::parse_generated_content;
use crate::posts::prompts::{build_image_prompt, build_post_prompt};
use crate::posts::session::SessionStore;
use crate::posts::tone::{PostLength, Tone};

#[derive(Debug, Clone, Deserialize)]
pub struct ComposeRequest {
    #[serde(default)]
    pub topic: String,
    pub tone: Option<String>,
    pub length: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    /// Runs the image chain inside this request. Off by default so text
    /// generation is never held up by the poll loop.
    #[serde(default)]
    pub include_image: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComposedPost {
    #[serde(flatten)]
    pub entry: HistoryEntry,
    pub generation_count: u32,
    pub remaining_free: Option<u32>,
}

/// Everything the composer needs besides the request itself.
pub struct Composer<'a> {
    pub sessions: &'a SessionStore,
    pub text: &'a dyn TextGenerator,
    pub images: &'a FallbackOrchestrator,
}

impl Composer<'_> {
    pub async fn compose(
        &self,
        session_id: Uuid,
        request: ComposeRequest,
        now: DateTime<Local>,
    ) -> Result<ComposedPost, AppError> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(AppError::Validation("topic is required".to_string()));
        }
        let tone = request
            .tone
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(Tone::default().key());
        let length = request
            .length
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(PostLength::default().key());

        let slot = self.sessions.claim_generation(session_id).await?;

        let prompt = build_post_prompt(topic, tone, length, &request.platforms);
        let (post, source) = match self.text.complete(&prompt).await {
            Ok(completion) if !completion.content.trim().is_empty() => {
                info!(%session_id, "post generated by AI");
                (
                    parse_generated_content(&completion.content, topic, tone, length, now),
                    ContentSource::AiGenerated,
                )
            }
            Ok(_) => {
                warn!(%session_id, "text model returned an empty reply, using demo content");
                (
                    generate_demo_content(topic, tone, length, now),
                    ContentSource::DemoContent,
                )
            }
            Err(e) => {
                warn!(%session_id, "text generation failed, using demo content: {e}");
                (
                    generate_demo_content(topic, tone, length, now),
                    ContentSource::DemoContent,
                )
            }
        };

        let image = if request.include_image {
            Some(self.compose_image(topic, tone).await)
        } else {
            None
        };

        let entry = HistoryEntry {
            post,
            source,
            image,
        };
        self.sessions.record(session_id, entry.clone()).await?;

        Ok(ComposedPost {
            entry,
            generation_count: slot.generation_count,
            remaining_free: slot.remaining_free,
        })
    }

    async fn compose_image(&self, topic: &str, tone: &str) -> PostImage {
        match self.images.generate(&build_image_prompt(topic, tone)).await {
            ImageOutcome::Generated(image) => PostImage {
                url: image.url,
                source_label: image.source_label,
                fallback: false,
            },
            ImageOutcome::AllProvidersFailed { failures } => {
                warn!(
                    attempts = failures.len(),
                    "image chain exhausted, using fallback art"
                );
                PostImage {
                    url: fallback_art::render(topic),
                    source_label: FALLBACK_LABEL.to_string(),
                    fallback: true,
                }
            }
        }
    }
}
