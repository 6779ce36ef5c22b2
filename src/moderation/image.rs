use serde::{Deserialize, Serialize};

use super::lenient_score;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NudityScores {
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub raw: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub partial: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub safe: Option<f64>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OffensiveScores {
    #[serde(default, deserialize_with = "lenient_score", skip_serializing_if = "Option::is_none")]
    pub prob: Option<f64>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Scores returned by the `nudity,wad,offensive` image models.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ImageScores {
    #[serde(default)]
    pub nudity: NudityScores,
    #[serde(default, deserialize_with = "lenient_score")]
    pub weapon: Option<f64>,
    #[serde(default, deserialize_with = "lenient_score")]
    pub drugs: Option<f64>,
    #[serde(default)]
    pub offensive: OffensiveScores,
}

/// Echo of the vendor scores returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageDetails {
    pub nudity: NudityScores,
    pub weapon: f64,
    pub drugs: f64,
    pub offensive: OffensiveScores,
}

impl From<ImageScores> for ImageDetails {
    fn from(scores: ImageScores) -> Self {
        Self {
            nudity: scores.nudity,
            weapon: scores.weapon.unwrap_or(0.0),
            drugs: scores.drugs.unwrap_or(0.0),
            offensive: scores.offensive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageVerdict {
    pub is_safe: bool,
    pub reason: Option<String>,
}

/// An image is unsafe once any score reaches its threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageThresholds {
    pub nudity_raw: f64,
    pub weapon: f64,
    pub drugs: f64,
    pub offensive: f64,
    /// Unsafe when `nudity.partial` is at or above this value.
    pub nudity_partial: Option<f64>,
    /// Unsafe when `nudity.safe` is at or below this value.
    pub nudity_safe_min: Option<f64>,
}

impl Default for ImageThresholds {
    fn default() -> Self {
        Self {
            nudity_raw: 0.4,
            weapon: 0.4,
            drugs: 0.4,
            offensive: 0.4,
            nudity_partial: None,
            nudity_safe_min: None,
        }
    }
}

impl ImageThresholds {
    pub fn strict() -> Self {
        Self {
            nudity_partial: Some(0.7),
            nudity_safe_min: Some(0.7),
            ..Self::default()
        }
    }

    pub fn evaluate(&self, scores: &ImageScores) -> ImageVerdict {
        let nudity = &scores.nudity;
        let nudity_flagged = nudity.raw.unwrap_or(0.0) >= self.nudity_raw
            || self
                .nudity_partial
                .is_some_and(|limit| nudity.partial.unwrap_or(0.0) >= limit)
            || self
                .nudity_safe_min
                .is_some_and(|limit| nudity.safe.unwrap_or(1.0) <= limit);

        let reason = if nudity_flagged {
            Some("Image contains nudity")
        } else if scores.weapon.unwrap_or(0.0) >= self.weapon {
            Some("Image contains weapons")
        } else if scores.drugs.unwrap_or(0.0) >= self.drugs {
            Some("Image contains drugs")
        } else if scores.offensive.prob.unwrap_or(0.0) >= self.offensive {
            Some("Image contains offensive content")
        } else {
            None
        };

        ImageVerdict {
            is_safe: reason.is_none(),
            reason: reason.map(str::to_string),
        }
    }
}
