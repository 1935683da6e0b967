//! The uniform image-provider contract shared by every adapter.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// A successfully generated image. `url` is either a data URI or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageResult {
    pub url: String,
    pub source_label: String,
}

impl ImageResult {
    pub fn is_well_formed(&self) -> bool {
        !self.url.trim().is_empty() && !self.source_label.trim().is_empty()
    }
}

/// Why a single provider attempt failed. Never escapes the orchestrator.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {waited_ms}ms")]
    Timeout { waited_ms: u128 },

    #[error("no API key configured")]
    MissingCredential,
}

/// One image-generation backend.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Human-readable label reported as the image source.
    fn label(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<ImageResult, ProviderError>;
}

/// Turns a non-success status into `UpstreamStatus`.
pub(crate) fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ProviderError::UpstreamStatus {
            status: status.as_u16(),
        })
    }
}

/// Decodes a JSON body; a body that does not fit `T` is malformed, not a
/// network failure.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}

/// Wraps raw image bytes as a base64 data URI.
pub(crate) fn bytes_data_uri(mime: &str, bytes: &[u8]) -> String {
    base64_data_uri(mime, &STANDARD.encode(bytes))
}

/// Wraps an already base64-encoded payload as a data URI.
pub(crate) fn base64_data_uri(mime: &str, payload: &str) -> String {
    format!("data:{mime};base64,{payload}")
}
