//! Clipdrop adapter: synchronous provider that answers with raw image bytes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use reqwest::Client;

use crate::images::provider::{
    bytes_data_uri, check_status, ImageProvider, ImageResult, ProviderError,
};

pub const LABEL: &str = "Clipdrop";
const TEXT_TO_IMAGE_PATH: &str = "/text-to-image/v1";

#[derive(Clone)]
pub struct Clipdrop {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Clipdrop {
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
impl ImageProvider for Clipdrop {
    fn label(&self) -> &'static str {
        LABEL
    }

    async fn generate(&self, prompt: &str) -> Result<ImageResult, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingCredential)?;

        let response = self
            .client
            .post(format!("{}{TEXT_TO_IMAGE_PATH}", self.base_url))
            .header("x-api-key", api_key)
            .multipart(Form::new().text("prompt", prompt.to_string()))
            .send()
            .await?;
        let response = check_status(response)?;

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .unwrap_or_else(|| "image/png".to_string());

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "empty image body".to_string(),
            ));
        }

        Ok(ImageResult {
            url: bytes_data_uri(&mime, &bytes),
            source_label: LABEL.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn clipdrop(server: &MockServer) -> Clipdrop {
        Clipdrop::new(
            server.uri(),
            Some("clip-key".to_string()),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_binary_body_becomes_data_uri() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEXT_TO_IMAGE_PATH))
            .and(header("x-api-key", "clip-key"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(b"hi".to_vec(), "image/png"))
            .expect(1)
            .mount(&server)
            .await;

        let result = clipdrop(&server).generate("a fox").await.unwrap();
        assert_eq!(result.url, "data:image/png;base64,aGk=");
        assert_eq!(result.source_label, LABEL);
    }

    #[tokio::test]
    async fn test_non_image_content_type_defaults_to_png() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(b"hi".to_vec(), "application/octet-stream"),
            )
            .mount(&server)
            .await;

        let result = clipdrop(&server).generate("a fox").await.unwrap();
        assert!(result.url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(402))
            .expect(1)
            .mount(&server)
            .await;

        let err = clipdrop(&server).generate("a fox").await.unwrap_err();
        assert!(matches!(err, ProviderError::UpstreamStatus { status: 402 }));
    }

    #[tokio::test]
    async fn test_empty_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = clipdrop(&server).generate("a fox").await.unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }
}
