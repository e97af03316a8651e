use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::models::domain::QuizRequest;

// The closing quote is optional: an unterminated value runs to the end of the prompt.
static COMMAND_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r#"command: "([^"]*)"#).expect("COMMAND_REGEX is a valid regex pattern")
});

/// Payload read from the input channel.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequestDto {
    pub prompt: String,

    #[serde(rename = "modelPath")]
    pub model_path: String,
}

impl QuizRequestDto {
    pub fn from_json(input: &str) -> AppResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| AppError::InvalidRequest(format!("malformed request JSON: {}", e)))
    }

    /// The `command: "<value>"` embedded in the prompt, or the whole prompt.
    pub fn effective_command(&self) -> String {
        match COMMAND_REGEX.captures(&self.prompt) {
            Some(captures) => captures[1].to_string(),
            None => self.prompt.trim().to_string(),
        }
    }
}

// An empty command is still a request; the model decides what to make of it.
impl From<QuizRequestDto> for QuizRequest {
    fn from(dto: QuizRequestDto) -> Self {
        QuizRequest::new(dto.effective_command(), dto.model_path)
    }
}
