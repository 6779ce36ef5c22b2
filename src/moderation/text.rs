use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

/// Match intensity: a probability, or a `low`/`medium`/`high` severity label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Intensity {
    Score(f64),
    Severity(String),
}

impl Intensity {
    pub fn score(&self) -> f64 {
        match self {
            Intensity::Score(v) => *v,
            Intensity::Severity(label) => match label.to_ascii_lowercase().as_str() {
                "low" => 0.3,
                "medium" => 0.6,
                "high" => 0.9,
                _ => 0.0,
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextMatch {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl TextMatch {
    fn score(&self) -> f64 {
        self.intensity.as_ref().map(Intensity::score).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MatchGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub matches: Vec<TextMatch>,
}

/// Result of the `profanity,personal` text models.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TextScores {
    #[serde(default, deserialize_with = "null_as_default")]
    pub profanity: MatchGroup,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personal: MatchGroup,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextDetails {
    pub profanity_matches: Vec<TextMatch>,
    pub personal_matches: Vec<TextMatch>,
}

impl From<TextScores> for TextDetails {
    fn from(scores: TextScores) -> Self {
        Self {
            profanity_matches: scores.profanity.matches,
            personal_matches: scores.personal.matches,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextVerdict {
    pub is_appropriate: bool,
    pub reason: Option<String>,
}

/// Any match strictly above `threshold` makes the text inappropriate.
/// Personal information is checked last, so its reason wins when both trigger.
pub fn evaluate_text(scores: &TextScores, threshold: f64) -> TextVerdict {
    let mut reason = None;

    if scores.profanity.matches.iter().any(|m| m.score() > threshold) {
        reason = Some("Text contains inappropriate content");
    }
    if scores.personal.matches.iter().any(|m| m.score() > threshold) {
        reason = Some("Text contains personal information");
    }

    TextVerdict {
        is_appropriate: reason.is_none(),
        reason: reason.map(str::to_string),
    }
}
