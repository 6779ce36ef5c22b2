use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::ai::persona::StylebotInfo;
use crate::ai::{
    build_messages, build_system_prompt, CompletionRequest, HistoryEntry, Stylebot,
    StylePreferences,
};
use crate::api::error::ApiError;
use crate::api::{parse_body, AppState};
use crate::de::null_as_default;
use crate::media::decode_base64_image;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "StyleBot is not properly configured. Please contact support.";

/// Older app builds send `history` and `userPreferences`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(alias = "history", deserialize_with = "null_as_default")]
    pub conversation_history: Vec<HistoryEntry>,
    #[serde(alias = "userPreferences", deserialize_with = "null_as_default")]
    pub user_style_preferences: StylePreferences,
    pub selected_stylebot: Option<String>,
    pub image: Option<String>,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub message: String,
    pub conversation_id: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: ChatReply,
}

/// `POST /chat`
pub async fn send(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    if !state.config.has_openai_key() {
        return Err(ApiError::NotConfigured(NOT_CONFIGURED_MESSAGE));
    }

    let req: ChatRequest = parse_body(&body)?;
    let message = req
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or(ApiError::MissingField(
            "Message is required and could not be found in request",
        ))?;

    let image = match req.image.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => Some(decode_base64_image(raw)?),
        None => None,
    };

    let stylebot = req
        .selected_stylebot
        .as_deref()
        .map(Stylebot::from_id)
        .unwrap_or_default();
    let system_prompt = build_system_prompt(&req.user_style_preferences, stylebot);
    let messages = build_messages(
        &system_prompt,
        &req.conversation_history,
        &message,
        image.as_ref(),
    );

    log::debug!(
        "StyleBot {} replying with {} history entries (image: {})",
        stylebot.name(),
        req.conversation_history.len(),
        image.is_some()
    );

    let reply = state
        .completion
        .complete(CompletionRequest {
            messages,
            vision: image.is_some(),
        })
        .await?;

    Ok(Json(ChatResponse {
        success: true,
        response: ChatReply {
            message: reply,
            conversation_id: chrono::Utc::now().timestamp().to_string(),
        },
    }))
}

/// `GET /stylebots`
pub async fn stylebots() -> Json<Vec<StylebotInfo>> {
    Json(Stylebot::ALL.into_iter().map(Stylebot::info).collect())
}
