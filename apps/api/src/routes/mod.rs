pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as content;
use crate::humanize::handlers as humanize;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Humanize API
        .route("/api/v1/humanize", post(humanize::handle_humanize))
        .route("/api/v1/humanize/runs/:id", get(humanize::handle_get_run))
        .route(
            "/api/v1/humanize/runs/:id/restore",
            post(humanize::handle_restore),
        )
        // Content API
        .route("/api/v1/content/generate", post(content::handle_generate))
        .route("/api/v1/content/refine", post(content::handle_refine))
        .route(
            "/api/v1/content/suggestions",
            post(content::handle_suggestions),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::humanize::rewriter::RewriteError;
    use crate::humanize::{HumanizeSettings, Rewriter};
    use crate::llm_client::{LlmError, TextGenerator};

    struct EchoRewriter;

    #[async_trait]
    impl Rewriter for EchoRewriter {
        async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
            Ok(text.to_string())
        }
    }

    struct StubLlm(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for StubLlm {
        async fn generate_text(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.0.map(str::to_string).ok_or(LlmError::EmptyContent)
        }
    }

    /// The pool never connects; only routes that stop before the database are exercised.
    fn app(llm: StubLlm) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/humanizer_test")
            .unwrap();
        build_router(AppState {
            db,
            rewriter: Arc::new(EchoRewriter),
            generator: Arc::new(llm),
            humanize: HumanizeSettings::default(),
        })
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(StubLlm(None))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_humanize_rejects_blank_content() {
        let (status, body) = post_json(
            app(StubLlm(None)),
            "/api/v1/humanize",
            json!({"content": "   "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_run_lookup_rejects_malformed_id() {
        let response = app(StubLlm(None))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/humanize/runs/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suggestions_route_returns_parsed_list() {
        let (status, body) = post_json(
            app(StubLlm(Some("1. Add an FAQ\n2. Shorten the intro"))),
            "/api/v1/content/suggestions",
            json!({"content": "# Post\n\nSome text."}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions"], json!(["Add an FAQ", "Shorten the intro"]));
    }

    #[tokio::test]
    async fn test_generate_route_maps_llm_failure_to_bad_gateway() {
        let (status, body) = post_json(
            app(StubLlm(None)),
            "/api/v1/content/generate",
            json!({
                "title": "Email Marketing",
                "content_type": "Blog Post",
                "audience": "founders",
                "word_count": 800
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_generate_route_validates_word_count() {
        let (status, _) = post_json(
            app(StubLlm(Some("unused"))),
            "/api/v1/content/generate",
            json!({
                "title": "Email Marketing",
                "content_type": "Landing Page",
                "audience": "founders",
                "word_count": 0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
