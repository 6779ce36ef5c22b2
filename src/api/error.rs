//! Error responses shared by every handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::ai::ChatError;
use crate::media::MediaError;
use crate::moderation::ModerationError;

pub const CHAT_UNAVAILABLE_MESSAGE: &str =
    "Sorry, StyleBot is having trouble right now. Please try again in a moment.";

/// Body for failed requests: `{ "success": false, "code": ..., "message": ... }`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("{0}")]
    MissingField(&'static str),
    #[error("Failed to decode image data: {0}")]
    InvalidImage(String),
    #[error("{0}")]
    NotConfigured(&'static str),
    #[error("SightEngine API error: {0}")]
    ModerationVendor(String),
    #[error("Chat completion failed: {0}")]
    ChatUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "INVALID_JSON", self.to_string()),
            ApiError::MissingField(msg) => {
                (StatusCode::BAD_REQUEST, "MISSING_FIELD", msg.to_string())
            }
            ApiError::InvalidImage(detail) => {
                log::warn!("Rejected image payload: {}", detail);
                (
                    StatusCode::BAD_REQUEST,
                    "INVALID_IMAGE",
                    "Failed to decode image data".to_string(),
                )
            }
            ApiError::NotConfigured(msg) => {
                log::error!("Handler called without credentials: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED", msg.to_string())
            }
            ApiError::ModerationVendor(detail) => {
                log::error!("Moderation vendor error: {}", detail);
                (StatusCode::BAD_GATEWAY, "VENDOR_ERROR", self.to_string())
            }
            ApiError::ChatUnavailable(detail) => {
                log::error!("Error processing StyleBot request: {}", detail);
                (
                    StatusCode::BAD_GATEWAY,
                    "CHAT_UNAVAILABLE",
                    CHAT_UNAVAILABLE_MESSAGE.to_string(),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            code,
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        ApiError::InvalidImage(err.to_string())
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::NotConfigured => {
                ApiError::NotConfigured("Content moderation is not properly configured.")
            }
            other => ApiError::ModerationVendor(other.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::NotConfigured => ApiError::NotConfigured(super::endpoints::chat::NOT_CONFIGURED_MESSAGE),
            other => ApiError::ChatUnavailable(other.to_string()),
        }
    }
}
