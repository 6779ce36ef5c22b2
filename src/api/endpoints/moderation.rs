//! Image and text moderation endpoints.
//!
//! Both forward the payload to the moderation provider, apply the configured
//! thresholds to the returned scores and echo the scores back as `details`.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::{parse_body, AppState};
use crate::media::decode_base64_image;
use crate::moderation::{evaluate_text, ImageDetails, TextDetails};

#[derive(Deserialize)]
pub struct ImageModerationRequest {
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Serialize)]
pub struct ImageModerationResponse {
    pub success: bool,
    pub is_safe: bool,
    pub reason: Option<String>,
    pub details: ImageDetails,
}

#[derive(Deserialize)]
pub struct TextModerationRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize)]
pub struct TextModerationResponse {
    pub success: bool,
    pub is_appropriate: bool,
    pub reason: Option<String>,
    pub details: TextDetails,
}

/// `POST /moderate/image`
pub async fn image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImageModerationResponse>, ApiError> {
    let req: ImageModerationRequest = parse_body(&body)?;
    let raw = req
        .image
        .filter(|s| !s.trim().is_empty())
        .ok_or(ApiError::MissingField("No image provided."))?;

    let image = decode_base64_image(&raw)?;
    log::debug!("Decoded {} byte {} image", image.bytes.len(), image.mime_type);

    let scores = state.moderation.check_image(&image).await?;
    let verdict = state.config.image_thresholds.evaluate(&scores);

    if !verdict.is_safe {
        log::info!("Image flagged: {}", verdict.reason.as_deref().unwrap_or_default());
    }

    Ok(Json(ImageModerationResponse {
        success: true,
        is_safe: verdict.is_safe,
        reason: verdict.reason,
        details: scores.into(),
    }))
}

/// `POST /moderate/text`
pub async fn text(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TextModerationResponse>, ApiError> {
    let req: TextModerationRequest = parse_body(&body)?;
    let text = req
        .text
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::MissingField("No text provided."))?;

    let scores = state.moderation.check_text(&text).await?;
    let verdict = evaluate_text(&scores, state.config.text_threshold);

    if !verdict.is_appropriate {
        log::info!("Text flagged: {}", verdict.reason.as_deref().unwrap_or_default());
    }

    Ok(Json(TextModerationResponse {
        success: true,
        is_appropriate: verdict.is_appropriate,
        reason: verdict.reason,
        details: scores.into(),
    }))
}
