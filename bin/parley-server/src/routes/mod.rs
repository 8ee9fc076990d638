//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace span)
//! - Optional Swagger UI / OpenAPI spec (disable with `PARLEY_ENABLE_SWAGGER=false`)
//! - Health route
//! - Chat page and conversation endpoints

mod chat;
pub mod doc;
mod health;

use std::sync::Arc;

use axum::{middleware, Router};
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(chat::router());

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(&state)))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::views::Pages;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use parley_core::generation::ScriptedGenerator;
    use parley_core::{ChatService, ContextEntry, Role, SqliteStore};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        state: Arc<AppState>,
        generator: Arc<ScriptedGenerator>,
    }

    async fn harness() -> Harness {
        let config = Config::from_lookup(|_| None);
        let generator = Arc::new(ScriptedGenerator::new());
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let chat = ChatService::start(store, generator.clone(), config.chat_settings())
            .await
            .unwrap();
        let state = Arc::new(AppState {
            config: Arc::new(config),
            chat: Arc::new(chat),
            pages: Arc::new(Pages::new().unwrap()),
        });
        Harness {
            app: build(state.clone()),
            state,
            generator,
        }
    }

    impl Harness {
        async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
            let response = self.app.clone().oneshot(req).await.unwrap();
            let status = response.status();
            let bytes = response.into_body().collect().await.unwrap().to_bytes();
            (status, bytes.to_vec())
        }

        async fn submit(&self, body: &str) -> (StatusCode, Value) {
            let req = Request::builder()
                .method("POST")
                .uri("/get_response")
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .unwrap();
            let (status, bytes) = self.send(req).await;
            (status, serde_json::from_slice(&bytes).unwrap())
        }

        async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        async fn messages(&self) -> Vec<Value> {
            let (status, bytes) = self.get("/api/messages").await;
            assert_eq!(status, StatusCode::OK);
            serde_json::from_slice(&bytes).unwrap()
        }
    }

    #[tokio::test]
    async fn submit_returns_reply_and_stores_both_messages() {
        let h = harness().await;
        h.generator.push_reply("Hi, how can I help?");

        let (status, body) = h.submit(r#"{"message": "hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "response": "Hi, how can I help?" }));

        let messages = h.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "hello");
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[1]["content"], "Hi, how can I help?");
    }

    #[tokio::test]
    async fn blank_or_missing_message_is_bad_request() {
        let h = harness().await;
        for body in [r#"{"message": ""}"#, r#"{"message": "   \n"}"#, r#"{}"#, r#"{"message": null}"#] {
            let (status, json_body) = h.submit(body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert_eq!(json_body, json!({ "error": "Empty message" }));
        }
        assert!(h.messages().await.is_empty());
        assert!(h.generator.calls().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let h = harness().await;
        let (status, body) = h.submit("{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
        assert!(h.messages().await.is_empty());
    }

    #[tokio::test]
    async fn generation_failure_returns_500_and_keeps_user_message() {
        let h = harness().await;
        h.generator.push_failure("quota exceeded");

        let (status, body) = h.submit(r#"{"message": "hello"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("quota exceeded"));

        let messages = h.messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[tokio::test]
    async fn storage_failure_returns_500() {
        let h = harness().await;
        h.state.chat.store().close().await;

        let (status, body) = h.submit(r#"{"message": "hello"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().is_some());

        let (status, _) = h.get("/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn clear_chat_empties_log_and_resets_context_for_get_and_post() {
        let h = harness().await;
        for method in ["GET", "POST"] {
            h.submit(r#"{"message": "one"}"#).await;
            h.submit(r#"{"message": "two"}"#).await;

            let req = Request::builder()
                .method(method)
                .uri("/clear_chat")
                .body(Body::empty())
                .unwrap();
            let (status, bytes) = h.send(req).await;
            assert_eq!(status, StatusCode::OK);
            let body: Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(body, json!({ "status": "Chat cleared" }));

            assert!(h.messages().await.is_empty());
            assert_eq!(
                h.state.chat.context_snapshot(),
                vec![ContextEntry::new(Role::System, h.state.config.seed_message.clone())]
            );
        }
    }

    #[tokio::test]
    async fn index_renders_history_in_submission_order() {
        let h = harness().await;
        for i in 0..3 {
            let (status, _) = h.submit(&format!(r#"{{"message": "question {i}"}}"#)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let messages = h.messages().await;
        assert_eq!(messages.len(), 6);
        for (i, pair) in messages.chunks(2).enumerate() {
            assert_eq!(pair[0]["content"], format!("question {i}"));
            assert_eq!(pair[1]["content"], format!("echo: question {i}"));
        }

        let (status, bytes) = h.get("/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(bytes).unwrap();
        let positions: Vec<usize> = (0..3)
            .map(|i| html.find(&format!("question {i}")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn trace_id_is_echoed() {
        let h = harness().await;
        let trace_id = "6f1c1c3e-8f55-4a5e-9b2a-0a7d7c1e2b3f";
        let req = Request::get("/health")
            .header(trace::X_TRACE_ID, trace_id)
            .body(Body::empty())
            .unwrap();
        let response = h.app.clone().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[trace::X_TRACE_ID], trace_id);
    }

    #[tokio::test]
    async fn openapi_document_lists_chat_routes() {
        let h = harness().await;
        let (status, bytes) = h.get("/api-docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/get_response"].is_object());
        assert!(doc["paths"]["/clear_chat"].is_object());
    }
}
