use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::moderation::ImageThresholds;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub sightengine_user: String,
    pub sightengine_secret: String,
    pub sightengine_url: String,
    pub openai_api_key: String,
    pub openai_url: String,
    pub openai_model: String,
    pub openai_vision_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub image_thresholds: ImageThresholds,
    pub text_threshold: f64,
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            sightengine_user: String::new(),
            sightengine_secret: String::new(),
            sightengine_url: "https://api.sightengine.com/1.0".to_string(),
            openai_api_key: String::new(),
            openai_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_vision_model: "gpt-4o".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.95,
            image_thresholds: ImageThresholds::default(),
            text_threshold: 0.7,
            max_body_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load from an optional JSON file, then apply environment overrides.
    pub fn load(config_path: Option<&Path>) -> Self {
        let mut config = match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    log::warn!("Ignoring invalid config file {}: {}", path.display(), e);
                    Self::default()
                }),
                Err(e) => {
                    log::warn!("Could not read config file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Some(path) => {
                log::warn!("Config file {} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Credentials and deployment knobs come from the environment; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SIGHTENGINE_USER") {
            self.sightengine_user = v;
        }
        if let Some(v) = get("SIGHTENGINE_SECRET") {
            self.sightengine_secret = v;
        }
        if let Some(v) = get("SIGHTENGINE_URL") {
            self.sightengine_url = v;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.openai_api_key = v;
        }
        if let Some(v) = get("OPENAI_BASE_URL") {
            self.openai_url = v;
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = get("OPENAI_VISION_MODEL") {
            self.openai_vision_model = v;
        }
        if let Some(v) = get("STYLEBOT_BIND_ADDR") {
            self.bind_addr = v;
        }
        if let Some(v) = get("IMAGE_MODERATION_PROFILE") {
            match v.trim().to_ascii_lowercase().as_str() {
                "strict" => self.image_thresholds = ImageThresholds::strict(),
                "default" => self.image_thresholds = ImageThresholds::default(),
                other => log::warn!("Unknown IMAGE_MODERATION_PROFILE '{}', keeping current thresholds", other),
            }
        }
    }

    pub fn has_sightengine_credentials(&self) -> bool {
        !self.sightengine_user.is_empty() && !self.sightengine_secret.is_empty()
    }

    pub fn has_openai_key(&self) -> bool {
        !self.openai_api_key.is_empty()
    }
}
