pub mod health;

use axum::{
    http::StatusCode,
    routing::{get, post, MethodRouter},
    Router,
};

use crate::errors::AppError;
use crate::images::handlers as image_handlers;
use crate::posts::handlers as post_handlers;
use crate::state::AppState;

async fn not_implemented() -> Result<(), AppError> {
    Err(AppError::NotImplemented)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Bare OPTIONS gets an empty 200; CORS preflights are answered by the
/// `CorsLayer` before they reach this.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// POST-only proxy endpoint with explicit OPTIONS and a JSON 405 for the rest.
fn proxy_endpoint(handler: MethodRouter<AppState>) -> MethodRouter<AppState> {
    handler.options(preflight).fallback(method_not_allowed)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Proxy endpoints used by the browser client
        .route(
            "/api/generate-post",
            proxy_endpoint(post(post_handlers::handle_generate_post)),
        )
        .route(
            "/api/generate-image",
            proxy_endpoint(post(image_handlers::handle_generate_image)),
        )
        // Sessions: counter + history lifecycle
        .route("/api/sessions", post(post_handlers::handle_create_session))
        .route(
            "/api/sessions/:id",
            get(post_handlers::handle_get_session).delete(post_handlers::handle_delete_session),
        )
        .route(
            "/api/sessions/:id/history",
            get(post_handlers::handle_session_history),
        )
        .route(
            "/api/sessions/:id/posts",
            post(post_handlers::handle_compose_post),
        )
        // Auth is not part of this service yet
        .route("/api/auth/login", post(not_implemented))
        .route("/api/auth/signup", post(not_implemented))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tower_http::cors::CorsLayer;

    use crate::config::Config;
    use crate::images::orchestrator::tests::all_failing;
    use crate::llm_client::{Completion, LlmError, TextGenerator};
    use crate::posts::session::SessionStore;

    struct FixedText(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for FixedText {
        async fn complete(&self, _prompt: &str) -> Result<Completion, LlmError> {
            match self.0 {
                Some(content) => Ok(Completion {
                    content: content.to_string(),
                    usage: Some(json!({"total_tokens": 3})),
                }),
                None => Err(LlmError::Api {
                    status: 401,
                    message: "bad key".to_string(),
                }),
            }
        }
    }

    fn app(text: Option<&'static str>) -> Router {
        let state = AppState {
            config: Config::for_tests("http://127.0.0.1:9"),
            text: Arc::new(FixedText(text)),
            images: Arc::new(all_failing()),
            sessions: Arc::new(SessionStore::new()),
        };
        build_router(state).layer(CorsLayer::permissive())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn test_options_is_empty_200() {
        let response = app(None)
            .oneshot(empty_request("OPTIONS", "/api/generate-post"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_get_on_proxy_is_json_405() {
        let response = app(None)
            .oneshot(empty_request("GET", "/api/generate-image"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await, json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_responses_carry_cors_headers() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-post")
            .header(header::ORIGIN, "https://example.com")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"prompt":"hi"}"#))
            .unwrap();
        let response = app(Some("TITLE: x")).oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[tokio::test]
    async fn test_generate_post_requires_prompt() {
        let response = app(Some("x"))
            .oneshot(json_request("POST", "/api/generate-post", json!({"prompt": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({"error": "Prompt is required"}));
    }

    #[tokio::test]
    async fn test_malformed_body_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-post")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app(Some("x")).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_json_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-image")
            .body(Body::from(r#"{"prompt":"a fox"}"#))
            .unwrap();
        let response = app(None).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_generate_post_returns_content_and_usage() {
        let response = app(Some("TITLE: Foo"))
            .oneshot(json_request("POST", "/api/generate-post", json!({"prompt": "p"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"content": "TITLE: Foo", "usage": {"total_tokens": 3}})
        );
    }

    #[tokio::test]
    async fn test_generate_post_upstream_error_is_500() {
        let response = app(None)
            .oneshot(json_request("POST", "/api/generate-post", json!({"prompt": "p"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "OpenRouter API error: 401"})
        );
    }

    #[tokio::test]
    async fn test_generate_image_total_failure_shape() {
        let response = app(None)
            .oneshot(json_request("POST", "/api/generate-image", json!({"prompt": "a fox"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({
                "success": false,
                "error": "All image generation services failed",
                "fallback": true
            })
        );
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = app(None);

        let response = app
            .clone()
            .oneshot(empty_request("POST", "/api/sessions"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{id}/posts"),
                json!({"topic": "technology", "tone": "casual", "include_image": true}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let composed = body_json(response).await;
        assert_eq!(composed["source"], "Demo Content");
        assert_eq!(composed["image"]["fallback"], true);
        assert_eq!(composed["generation_count"], 1);
        assert_eq!(composed["remaining_free"], 9);

        let response = app
            .clone()
            .oneshot(empty_request("GET", &format!("/api/sessions/{id}/history")))
            .await
            .unwrap();
        let history = body_json(response).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["post"]["topic"], "technology");

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/sessions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(empty_request("GET", &format!("/api/sessions/{id}/history")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_auth_endpoints_are_stubs() {
        let response = app(None)
            .oneshot(empty_request("POST", "/api/auth/login"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_health_reports_provider_chain() {
        let response = app(None)
            .oneshot(empty_request("GET", "/health"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(
            body["image_providers"],
            json!(["AI Horde", "Clipdrop", "Stability AI"])
        );
    }
}
