use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
pub struct Sentence {
    pub id: String,
    #[validate(length(min = 1))]
    pub spanish: String,
    #[validate(length(min = 1))]
    pub english: String,
    pub difficulty: Difficulty,
    pub topic: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == value)
    }

    /// Picks the first level named anywhere in free text, e.g. "advanced phrases for travel".
    pub fn mentioned_in(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        Self::ALL.into_iter().find(|d| lower.contains(d.as_str()))
    }
}
