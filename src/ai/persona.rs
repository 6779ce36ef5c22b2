use serde::{Deserialize, Serialize};

use crate::de::null_as_default;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Stylebot {
    #[default]
    Lexi,
    Stella,
    Vivi,
    Bella,
}

#[derive(Debug, Clone, Serialize)]
pub struct StylebotInfo {
    pub id: Stylebot,
    pub name: &'static str,
    pub personality: &'static str,
}

impl Stylebot {
    pub const ALL: [Stylebot; 4] = [
        Stylebot::Lexi,
        Stylebot::Stella,
        Stylebot::Vivi,
        Stylebot::Bella,
    ];

    /// Unknown ids fall back to Lexi.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_ascii_lowercase().as_str() {
            "stella" => Stylebot::Stella,
            "vivi" => Stylebot::Vivi,
            "bella" => Stylebot::Bella,
            _ => Stylebot::Lexi,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stylebot::Lexi => "Lexi",
            Stylebot::Stella => "Stella",
            Stylebot::Vivi => "Vivi",
            Stylebot::Bella => "Bella",
        }
    }

    pub fn personality(self) -> &'static str {
        match self {
            Stylebot::Lexi => {
                "You are Lexi, a cheerful and candid fashion assistant. Your tone is upbeat and \
                 friendly, with a dash of playfulness. You're knowledgeable about current trends \
                 but also appreciate timeless pieces. You speak like a supportive friend who's \
                 excited to help style outfits."
            }
            Stylebot::Stella => {
                "You are Stella, a trendy fashion assistant who stays on the cutting edge. Your \
                 tone is cool and confident, with an eye for the latest styles. You love \
                 experimenting with fashion and encourage users to step out of their comfort \
                 zone, while still respecting their personal style."
            }
            Stylebot::Vivi => {
                "You are Vivi, a confident and fashion-forward assistant. Your tone is \
                 sophisticated and polished, with authoritative style knowledge. You focus on \
                 creating cohesive, well-put-together looks that make a statement, and you value \
                 quality over quantity."
            }
            Stylebot::Bella => {
                "You are Bella, an energetic and upbeat fashion assistant. Your tone is \
                 enthusiastic and encouraging, making styling fun and accessible. You're great at \
                 mixing high and low pieces and finding budget-friendly alternatives to trending \
                 styles."
            }
        }
    }

    pub fn info(self) -> StylebotInfo {
        StylebotInfo {
            id: self,
            name: self.name(),
            personality: self.personality(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StylePreferences {
    #[serde(deserialize_with = "null_as_default")]
    pub aesthetics: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub brands: Vec<String>,
    #[serde(rename = "keyPieces", deserialize_with = "null_as_default")]
    pub key_pieces: Vec<String>,
    #[serde(rename = "styleGoal")]
    pub style_goal: Option<String>,
}

const GUIDELINES: &[&str] = &[
    "Keep responses concise and focused on fashion advice",
    "Provide specific, actionable styling suggestions",
    "Recommend outfit combinations that match the user's aesthetic",
    "If asked about a specific clothing item, suggest ways to style it",
    "If the user mentions colors, suggest color combinations",
    "Consider current fashion trends while respecting the user's preferences",
    "Be enthusiastic and encouraging about the user's style journey",
];

pub fn build_system_prompt(preferences: &StylePreferences, stylebot: Stylebot) -> String {
    let mut prompt = String::from(stylebot.personality());
    prompt.push_str("\n\n");

    prompt.push_str(
        "Your goal is to provide style advice and fashion recommendations in a conversational \
         manner. Focus on engaging, personalized fashion advice that matches the user's \
         preferences. ",
    );

    if !preferences.aesthetics.is_empty() {
        prompt.push_str(&format!(
            "The user's aesthetic preferences include: {}. ",
            preferences.aesthetics.join(", ")
        ));
    }

    if !preferences.brands.is_empty() {
        prompt.push_str(&format!(
            "Their favorite brands include: {}. ",
            preferences.brands.join(", ")
        ));
    }

    if !preferences.key_pieces.is_empty() {
        prompt.push_str(&format!(
            "Key pieces in their wardrobe: {}. ",
            preferences.key_pieces.join(", ")
        ));
    }

    if let Some(goal) = preferences.style_goal.as_deref().filter(|g| !g.is_empty()) {
        prompt.push_str(&format!("Their style goal is: {}. ", goal));
    }

    prompt.push_str("\n\nGuidelines for your responses:");
    for line in GUIDELINES {
        prompt.push_str("\n- ");
        prompt.push_str(line);
    }

    prompt
}
