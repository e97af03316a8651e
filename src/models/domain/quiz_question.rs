use std::borrow::Cow;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Validate, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_correct_answer_in_options"))]
pub struct Question {
    pub id: String,
    pub question: String,
    pub correct_answer: String,
    #[validate(length(min = 2))]
    pub options: Vec<String>,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Translation,
    FillBlank,
    MultipleChoice,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::Translation,
        QuestionType::FillBlank,
        QuestionType::MultipleChoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Translation => "translation",
            QuestionType::FillBlank => "fill-blank",
            QuestionType::MultipleChoice => "multiple-choice",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

// The correct answer must be offered exactly once.
fn validate_correct_answer_in_options(question: &Question) -> Result<(), ValidationError> {
    let occurrences = question
        .options
        .iter()
        .filter(|option| **option == question.correct_answer)
        .count();

    if occurrences == 1 {
        return Ok(());
    }

    let message = format!(
        "correctAnswer appears {} times in options, expected exactly once",
        occurrences
    );
    Err(ValidationError::new("correct_answer_in_options").with_message(Cow::Owned(message)))
}
