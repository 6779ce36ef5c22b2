pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;

use std::sync::Arc;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::ai::{CompletionProvider, OpenAiClient};
use crate::config::AppConfig;
use crate::moderation::{ModerationProvider, SightEngineClient};
use error::ApiError;

pub use router::build_router;

/// Read-only state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub moderation: Arc<dyn ModerationProvider>,
    pub completion: Arc<dyn CompletionProvider>,
}

impl AppState {
    /// Wire the SightEngine and OpenAI clients from configuration.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let moderation = SightEngineClient::new(&config)?;
        let completion = OpenAiClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            moderation: Arc::new(moderation),
            completion: Arc::new(completion),
        })
    }
}

/// Parse a raw request body so malformed JSON gets our own error shape.
pub(crate) fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;

    if let Some(obj) = value.as_object() {
        log::debug!("Parsed body keys: {:?}", obj.keys().collect::<Vec<_>>());
    }

    serde_json::from_value(value).map_err(|e| ApiError::InvalidJson(e.to_string()))
}
