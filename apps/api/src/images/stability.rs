//! Stability AI adapter: synchronous provider that answers with base64 in JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::images::provider::{
    base64_data_uri, check_status, read_json, ImageProvider, ImageResult, ProviderError,
};

pub const LABEL: &str = "Stability AI";
const TEXT_TO_IMAGE_PATH: &str = "/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";
/// SDXL 1.0 only accepts its trained resolutions.
const SIDE_PX: u32 = 1024;

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    cfg_scale: u32,
    height: u32,
    width: u32,
    steps: u32,
    samples: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TextToImageResponse {
    artifacts: Option<Vec<Artifact>>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: Option<String>,
}

#[derive(Clone)]
pub struct StabilityAi {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl StabilityAi {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl ImageProvider for StabilityAi {
    fn label(&self) -> &'static str {
        LABEL
    }

    async fn generate(&self, prompt: &str) -> Result<ImageResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;

        let body = TextToImageRequest {
            text_prompts: [TextPrompt { text: prompt }],
            cfg_scale: 7,
            height: SIDE_PX,
            width: SIDE_PX,
            steps: 30,
            samples: 1,
        };

        let response = self
            .client
            .post(format!("{}{TEXT_TO_IMAGE_PATH}", self.base_url))
            .bearer_auth(api_key)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;
        let parsed: TextToImageResponse = read_json(check_status(response)?).await?;

        let payload = parsed
            .artifacts
            .and_then(|a| a.into_iter().next())
            .and_then(|a| a.base64)
            .filter(|b| !b.is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("no image generated by Stability AI".to_string())
            })?;

        Ok(ImageResult {
            url: base64_data_uri("image/png", &payload),
            source_label: LABEL.to_string(),
        })
    }
}
