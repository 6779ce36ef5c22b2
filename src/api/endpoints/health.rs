use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub moderation_configured: bool,
    pub chat_configured: bool,
}

/// `GET /health`: liveness plus which vendors have credentials.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        moderation_configured: state.config.has_sightengine_credentials(),
        chat_configured: state.config.has_openai_key(),
    })
}
