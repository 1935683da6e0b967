//! LLM Client: the single point of entry for all text-generation calls.
//!
//! ARCHITECTURAL RULE: No other module may call OpenRouter directly.
//! Callers depend on the `TextGenerator` trait so tests can substitute it.
//!
//! Model: openai/gpt-3.5-turbo (hardcoded)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
const REFERER: &str = "https://social-post-generator.vercel.app";
const APP_TITLE: &str = "Social Post Generator";
/// The model used for all text generation.
pub const MODEL: &str = "openai/gpt-3.5-turbo";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenRouter API error: {status}")]
    Api { status: u16, message: String },

    #[error("OPEN_ROUTER_API_KEY is not configured")]
    MissingApiKey,

    #[error("Invalid response from AI service")]
    EmptyContent,
}

/// Text returned by a successful completion, with the provider's usage block
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

/// Anything that can turn a prompt into text.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if the provider sent one.
    fn into_content(self) -> Option<(String, Option<serde_json::Value>)> {
        let content = self
            .choices
            .into_iter()
            .next()?
            .message?
            .content?;
        Some((content, self.usage))
    }
}

/// The single OpenRouter client used by all services.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
            api_key,
        }
    }

    /// Makes one chat-completion call. No retries: callers fall back to demo
    /// content on any error.
    pub async fn call(&self, prompt: &str) -> Result<Completion, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!(
            "{}{CHAT_COMPLETIONS_PATH}",
            self.base_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenRouter API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let (content, usage) = chat.into_content().ok_or(LlmError::EmptyContent)?;

        debug!("LLM call succeeded: {} chars", content.len());

        Ok(Completion { content, usage })
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError> {
        self.call(prompt).await
    }
}
