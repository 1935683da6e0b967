//! AI Horde adapter: the asynchronous job provider, first in the chain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::images::poll::{run_job, JobBackend, JobHandle, JobStatus, PollSettings};
use crate::images::provider::{
    base64_data_uri, check_status, read_json, ImageProvider, ImageResult, ProviderError,
};

pub const LABEL: &str = "AI Horde";
const CLIENT_AGENT: &str = "social-post-generator/1.0";
const MODEL: &str = "Stable Diffusion 2.1";

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    prompt: &'a str,
    params: serde_json::Value,
    models: [&'a str; 1],
    nsfw: bool,
    trusted_workers: bool,
    slow_workers: bool,
    censor_nsfw: bool,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    faulted: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    generations: Option<Vec<Generation>>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    img: Option<String>,
}

#[derive(Clone)]
pub struct AiHorde {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    poll: PollSettings,
}

impl AiHorde {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Duration,
        poll: PollSettings,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            poll,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/generate/{path}", self.base_url)
    }
}

#[async_trait]
impl JobBackend for AiHorde {
    async fn submit(&self, prompt: &str) -> Result<JobHandle, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;

        let body = SubmitRequest {
            prompt,
            params: json!({
                "width": 512,
                "height": 512,
                "steps": 20,
                "n": 1,
                "sampler_name": "k_euler",
                "cfg_scale": 7.5
            }),
            models: [MODEL],
            nsfw: false,
            trusted_workers: true,
            slow_workers: true,
            censor_nsfw: false,
        };

        let response = self
            .client
            .post(self.url("async"))
            .header("apikey", api_key)
            .header("Client-Agent", CLIENT_AGENT)
            .json(&body)
            .send()
            .await?;
        let submitted: SubmitResponse = read_json(check_status(response)?).await?;

        let id = submitted
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("no generation id".to_string()))?;
        Ok(JobHandle { id })
    }

    async fn status(&self, job: &JobHandle) -> Result<JobStatus, ProviderError> {
        let response = self
            .client
            .get(self.url(&format!("check/{}", job.id)))
            .header("Client-Agent", CLIENT_AGENT)
            .send()
            .await?;
        let check: CheckResponse = read_json(check_status(response)?).await?;

        if check.faulted {
            return Err(ProviderError::MalformedResponse("job faulted".to_string()));
        }
        if !check.done {
            return Ok(JobStatus::Pending);
        }

        let response = self
            .client
            .get(self.url(&format!("status/{}", job.id)))
            .header("Client-Agent", CLIENT_AGENT)
            .send()
            .await?;
        let status: StatusResponse = read_json(check_status(response)?).await?;

        status
            .generations
            .and_then(|g| g.into_iter().next())
            .and_then(|g| g.img)
            .filter(|img| !img.is_empty())
            .map(|payload| JobStatus::Done { payload })
            .ok_or_else(|| {
                ProviderError::MalformedResponse("done without generations".to_string())
            })
    }
}

#[async_trait]
impl ImageProvider for AiHorde {
    fn label(&self) -> &'static str {
        LABEL
    }

    async fn generate(&self, prompt: &str) -> Result<ImageResult, ProviderError> {
        let payload = run_job(self, prompt, self.poll).await?;
        debug!("AI Horde returned {} bytes of payload", payload.len());
        Ok(ImageResult {
            url: payload_to_url(payload),
            source_label: LABEL.to_string(),
        })
    }
}

/// Horde hands back either a hosted image URL or raw base64 webp.
fn payload_to_url(payload: String) -> String {
    if payload.starts_with("https://") || payload.starts_with("http://") {
        payload
    } else {
        base64_data_uri("image/webp", &payload)
    }
}
