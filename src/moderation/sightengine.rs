use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{ImageScores, ModerationError, ModerationProvider, TextScores};
use crate::config::AppConfig;
use crate::media::DecodedImage;

const IMAGE_MODELS: &str = "nudity,wad,offensive";
const TEXT_CATEGORIES: &str = "profanity,personal";

#[derive(Debug, Deserialize)]
struct Envelope {
    status: Option<String>,
    error: Option<VendorError>,
}

#[derive(Debug, Deserialize)]
struct VendorError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

pub struct SightEngineClient {
    client: Client,
    base_url: String,
    api_user: String,
    api_secret: String,
}

impl SightEngineClient {
    pub fn new(config: &AppConfig) -> Result<Self, ModerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.sightengine_url.trim_end_matches('/').to_string(),
            api_user: config.sightengine_user.clone(),
            api_secret: config.sightengine_secret.clone(),
        })
    }

    fn ensure_configured(&self) -> Result<(), ModerationError> {
        if self.api_user.is_empty() || self.api_secret.is_empty() {
            return Err(ModerationError::NotConfigured);
        }
        Ok(())
    }

    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ModerationError> {
        let status = response.status();
        let text = response.text().await?;
        log::debug!("SightEngine response ({}): {}", status, text);

        // Error pages from gateways are not JSON; the status still has to surface.
        let envelope = serde_json::from_str::<Envelope>(&text).ok();
        let vendor_error = envelope.as_ref().and_then(|e| e.error.as_ref()).and_then(|e| {
            match (e.kind.as_deref(), e.message.as_deref()) {
                (Some(kind), Some(message)) => Some(format!("{}: {}", kind, message)),
                (None, Some(message)) => Some(message.to_string()),
                (Some(kind), None) => Some(kind.to_string()),
                (None, None) => None,
            }
        });

        if !status.is_success() {
            let detail = vendor_error.unwrap_or_else(|| text.trim().to_string());
            return Err(ModerationError::Vendor(format!("status {}: {}", status, detail)));
        }
        if envelope.as_ref().and_then(|e| e.status.as_deref()) == Some("failure") {
            return Err(ModerationError::Vendor(
                vendor_error.unwrap_or_else(|| format!("status {}", status)),
            ));
        }

        serde_json::from_str(&text)
            .map_err(|e| ModerationError::Parse(format!("invalid JSON from SightEngine: {}", e)))
    }
}

#[async_trait]
impl ModerationProvider for SightEngineClient {
    async fn check_image(&self, image: &DecodedImage) -> Result<ImageScores, ModerationError> {
        self.ensure_configured()?;

        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name())
            .mime_str(image.mime_type)?;

        let form = reqwest::multipart::Form::new()
            .text("models", IMAGE_MODELS)
            .text("api_user", self.api_user.clone())
            .text("api_secret", self.api_secret.clone())
            .part("media", part);

        log::debug!(
            "Sending {} byte {} image to SightEngine",
            image.bytes.len(),
            image.mime_type
        );

        let response = self
            .client
            .post(format!("{}/check.json", self.base_url))
            .multipart(form)
            .send()
            .await?;

        Self::read_response(response).await
    }

    async fn check_text(&self, text: &str) -> Result<TextScores, ModerationError> {
        self.ensure_configured()?;

        let params = [
            ("text", text),
            ("lang", "en"),
            ("mode", "rules"),
            ("categories", TEXT_CATEGORIES),
            ("api_user", self.api_user.as_str()),
            ("api_secret", self.api_secret.as_str()),
        ];

        let response = self
            .client
            .post(format!("{}/text/check.json", self.base_url))
            .form(&params)
            .send()
            .await?;

        Self::read_response(response).await
    }
}
