pub mod openai;
pub mod persona;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::de::null_as_default;
use crate::media::DecodedImage;

pub use openai::OpenAiClient;
pub use persona::{build_system_prompt, Stylebot, StylePreferences};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("completion API key is not configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion API error ({status}): {body}")]
    Upstream { status: u16, body: String },
    #[error("completion response had no message content")]
    EmptyCompletion,
}

/// One message in the chat-completions wire format. `content` is either a
/// string or an array of typed parts for vision requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: serde_json::Value,
}

impl ChatMessage {
    pub fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: serde_json::Value::String(content.to_string()),
        }
    }
}

/// A prior turn as sent by the client app.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(rename = "isUser", default, deserialize_with = "null_as_default")]
    pub is_user: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    /// Route to the vision-capable model.
    pub vision: bool,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ChatError>;
}

/// System prompt, then history, then the new user turn (with the image attached if any).
pub fn build_messages(
    system_prompt: &str,
    history: &[HistoryEntry],
    message: &str,
    image: Option<&DecodedImage>,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::text("system", system_prompt));

    for entry in history {
        let role = if entry.is_user { "user" } else { "assistant" };
        messages.push(ChatMessage::text(role, &entry.text));
    }

    match image {
        Some(img) => messages.push(ChatMessage {
            role: "user".to_string(),
            content: serde_json::json!([
                {
                    "type": "text",
                    "text": message
                },
                {
                    "type": "image_url",
                    "image_url": {
                        "url": img.data_url(),
                        "detail": "low"
                    }
                }
            ]),
        }),
        None => messages.push(ChatMessage::text("user", message)),
    }

    messages
}
