//! HTTP router for the function handlers.
//!
//! Every route shares `AppState`. Layers, innermost first: body limit,
//! access log, CORS.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/stylebots", get(endpoints::chat::stylebots))
        .route("/moderate/image", post(endpoints::moderation::image))
        .route("/moderate/text", post(endpoints::moderation::text))
        .route("/chat", post(endpoints::chat::send))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum::middleware::from_fn(middleware::log_access))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use tower::ServiceExt;

    use crate::ai::{ChatError, CompletionProvider, CompletionRequest};
    use crate::config::AppConfig;
    use crate::media::DecodedImage;
    use crate::moderation::{ImageScores, ModerationError, ModerationProvider, TextScores};

    struct FakeModeration {
        image: serde_json::Value,
        text: serde_json::Value,
        vendor_error: Option<&'static str>,
    }

    impl FakeModeration {
        fn clean() -> Self {
            Self {
                image: serde_json::json!({
                    "nudity": {"raw": 0.01, "partial": 0.01, "safe": 0.98},
                    "weapon": 0.01,
                    "drugs": 0.0,
                    "offensive": {"prob": 0.02}
                }),
                text: serde_json::json!({
                    "profanity": {"matches": []},
                    "personal": {"matches": []}
                }),
                vendor_error: None,
            }
        }
    }

    #[async_trait]
    impl ModerationProvider for FakeModeration {
        async fn check_image(&self, _image: &DecodedImage) -> Result<ImageScores, ModerationError> {
            if let Some(msg) = self.vendor_error {
                return Err(ModerationError::Vendor(msg.to_string()));
            }
            serde_json::from_value(self.image.clone()).map_err(|e| ModerationError::Parse(e.to_string()))
        }

        async fn check_text(&self, _text: &str) -> Result<TextScores, ModerationError> {
            if let Some(msg) = self.vendor_error {
                return Err(ModerationError::Vendor(msg.to_string()));
            }
            serde_json::from_value(self.text.clone()).map_err(|e| ModerationError::Parse(e.to_string()))
        }
    }

    #[derive(Default)]
    struct FakeCompletion {
        fail: bool,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl CompletionProvider for FakeCompletion {
        async fn complete(&self, request: CompletionRequest) -> Result<String, ChatError> {
            self.seen.lock().unwrap().push(request);
            if self.fail {
                return Err(ChatError::Upstream {
                    status: 500,
                    body: "server error".into(),
                });
            }
            Ok("Pair it with white sneakers!".to_string())
        }
    }

    fn configured() -> AppConfig {
        AppConfig {
            openai_api_key: "sk-test".into(),
            sightengine_user: "user".into(),
            sightengine_secret: "secret".into(),
            ..AppConfig::default()
        }
    }

    fn app_with(
        config: AppConfig,
        moderation: FakeModeration,
        completion: Arc<FakeCompletion>,
    ) -> Router {
        build_router(AppState {
            config: Arc::new(config),
            moderation: Arc::new(moderation),
            completion,
        })
    }

    fn app() -> Router {
        app_with(configured(), FakeModeration::clean(), Arc::default())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn jpeg_b64() -> String {
        STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'])
    }

    #[tokio::test]
    async fn health_reports_configured_vendors() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["moderation_configured"], true);
        assert_eq!(json["chat_configured"], true);
    }

    #[tokio::test]
    async fn stylebots_lists_all_personas() {
        let req = Request::builder().uri("/stylebots").body(Body::empty()).unwrap();
        let response = app().oneshot(req).await.unwrap();
        let json = json_body(response).await;
        let ids: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["lexi", "stella", "vivi", "bella"]);
    }

    #[tokio::test]
    async fn image_moderation_reports_safe() {
        let body = serde_json::json!({ "image": format!("data:image/jpeg;base64,{}", jpeg_b64()) });
        let response = app()
            .oneshot(post_json("/moderate/image", &body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["is_safe"], true);
        assert!(json["reason"].is_null());
        assert_eq!(json["details"]["offensive"]["prob"], 0.02);
    }

    #[tokio::test]
    async fn image_moderation_flags_weapon() {
        let mut moderation = FakeModeration::clean();
        moderation.image["weapon"] = serde_json::json!(0.85);
        let app = app_with(configured(), moderation, Arc::default());

        let body = serde_json::json!({ "image": jpeg_b64() });
        let response = app
            .oneshot(post_json("/moderate/image", &body.to_string()))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["is_safe"], false);
        assert_eq!(json["reason"], "Image contains weapons");
        assert_eq!(json["details"]["weapon"], 0.85);
    }

    #[tokio::test]
    async fn image_moderation_requires_image() {
        let response = app()
            .oneshot(post_json("/moderate/image", r#"{"image": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "MISSING_FIELD");
        assert_eq!(json["message"], "No image provided.");
    }

    #[tokio::test]
    async fn image_moderation_rejects_bad_base64() {
        let response = app()
            .oneshot(post_json("/moderate/image", r#"{"image": "%%%%"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["code"], "INVALID_IMAGE");
    }

    #[tokio::test]
    async fn malformed_json_returns_parse_error() {
        let response = app()
            .oneshot(post_json("/moderate/text", "{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "INVALID_JSON");
        assert!(json["message"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn text_moderation_flags_personal_info() {
        let mut moderation = FakeModeration::clean();
        moderation.text["personal"]["matches"] = serde_json::json!([
            {"type": "email", "match": "me@example.com", "intensity": "high"}
        ]);
        let app = app_with(configured(), moderation, Arc::default());

        let response = app
            .oneshot(post_json("/moderate/text", r#"{"text": "mail me@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["is_appropriate"], false);
        assert_eq!(json["reason"], "Text contains personal information");
        assert_eq!(json["details"]["personal_matches"][0]["type"], "email");
    }

    #[tokio::test]
    async fn text_moderation_requires_text() {
        let response = app()
            .oneshot(post_json("/moderate/text", r#"{}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["message"], "No text provided.");
    }

    #[tokio::test]
    async fn whitespace_text_is_forwarded() {
        let response = app()
            .oneshot(post_json("/moderate/text", r#"{"text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["is_appropriate"], true);

        let response = app()
            .oneshot(post_json("/moderate/text", r#"{"text": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn vendor_failure_returns_502() {
        let mut moderation = FakeModeration::clean();
        moderation.vendor_error = Some("usage_limit: daily limit reached");
        let app = app_with(configured(), moderation, Arc::default());

        let response = app
            .oneshot(post_json("/moderate/text", r#"{"text": "hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["code"], "VENDOR_ERROR");
        assert_eq!(
            json["message"],
            "SightEngine API error: usage_limit: daily limit reached"
        );
    }

    #[tokio::test]
    async fn chat_relays_completion() {
        let completion = Arc::new(FakeCompletion::default());
        let app = app_with(configured(), FakeModeration::clean(), completion.clone());

        let body = serde_json::json!({
            "message": "What should I wear to a gallery opening?",
            "history": [{"isUser": true, "text": "hi"}, {"isUser": false, "text": "hey!"}],
            "userPreferences": {"aesthetics": ["minimalist"]},
            "selected_stylebot": "vivi"
        });
        let response = app.oneshot(post_json("/chat", &body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["response"]["message"], "Pair it with white sneakers!");
        let conversation_id = json["response"]["conversation_id"].as_str().unwrap();
        assert!(conversation_id.parse::<i64>().is_ok());

        let seen = completion.seen.lock().unwrap();
        let request = &seen[0];
        assert!(!request.vision);
        assert_eq!(request.messages.len(), 4);
        let system = request.messages[0].content.as_str().unwrap();
        assert!(system.starts_with("You are Vivi"));
        assert!(system.contains("minimalist"));
        assert_eq!(request.messages[2].role, "assistant");
    }

    #[tokio::test]
    async fn chat_accepts_null_preference_lists() {
        let completion = Arc::new(FakeCompletion::default());
        let app = app_with(configured(), FakeModeration::clean(), completion.clone());

        let body = serde_json::json!({
            "message": "Help me pack for a weekend away",
            "userPreferences": {
                "aesthetics": null,
                "brands": null,
                "keyPieces": ["denim jacket"],
                "styleGoal": null
            },
            "history": null
        });
        let response = app.oneshot(post_json("/chat", &body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = completion.seen.lock().unwrap();
        let system = seen[0].messages[0].content.as_str().unwrap();
        assert!(system.starts_with("You are Lexi"));
        assert!(!system.contains("aesthetic preferences"));
        assert!(!system.contains("favorite brands"));
        assert!(system.contains("Key pieces in their wardrobe: denim jacket. "));
        assert_eq!(seen[0].messages.len(), 2);
    }

    #[tokio::test]
    async fn chat_with_image_uses_vision() {
        let completion = Arc::new(FakeCompletion::default());
        let app = app_with(configured(), FakeModeration::clean(), completion.clone());

        let body = serde_json::json!({
            "message": "Does this jacket work?",
            "selected_stylebot": "unknown-bot",
            "image": jpeg_b64()
        });
        let response = app.oneshot(post_json("/chat", &body.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = completion.seen.lock().unwrap();
        assert!(seen[0].vision);
        assert!(seen[0].messages[0].content.as_str().unwrap().starts_with("You are Lexi"));
        let user = &seen[0].messages[1];
        assert_eq!(user.content[1]["type"], "image_url");
    }

    #[tokio::test]
    async fn chat_requires_message() {
        let response = app()
            .oneshot(post_json("/chat", r#"{"message": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["message"],
            "Message is required and could not be found in request"
        );
    }

    #[tokio::test]
    async fn chat_without_key_is_not_configured() {
        let app = app_with(AppConfig::default(), FakeModeration::clean(), Arc::default());
        let response = app
            .oneshot(post_json("/chat", r#"{"message": "hi"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await["message"],
            "StyleBot is not properly configured. Please contact support."
        );
    }

    #[tokio::test]
    async fn chat_upstream_failure_is_generic() {
        let completion = Arc::new(FakeCompletion {
            fail: true,
            ..Default::default()
        });
        let app = app_with(configured(), FakeModeration::clean(), completion);
        let response = app
            .oneshot(post_json("/chat", r#"{"message": "hi"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(
            json["message"],
            "Sorry, StyleBot is having trouble right now. Please try again in a moment."
        );
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let config = AppConfig {
            max_body_bytes: 64,
            ..configured()
        };
        let app = app_with(config, FakeModeration::clean(), Arc::default());
        let body = serde_json::json!({ "text": "x".repeat(256) });
        let response = app
            .oneshot(post_json("/moderate/text", &body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
