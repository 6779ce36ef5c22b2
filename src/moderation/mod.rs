pub mod image;
pub mod sightengine;
pub mod text;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::media::DecodedImage;

pub use self::image::{ImageDetails, ImageScores, ImageThresholds, ImageVerdict};
pub use self::sightengine::SightEngineClient;
pub use self::text::{evaluate_text, Intensity, TextDetails, TextMatch, TextScores, TextVerdict};

#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    #[error("moderation credentials are not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Vendor(String),
    #[error("unexpected response: {0}")]
    Parse(String),
}

/// Content-safety scoring backend.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    async fn check_image(&self, image: &DecodedImage) -> Result<ImageScores, ModerationError>;
    async fn check_text(&self, text: &str) -> Result<TextScores, ModerationError>;
}

/// Vendors occasionally return objects where a bare probability is expected; treat those as absent.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}
