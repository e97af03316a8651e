use crate::models::domain::sentence::Difficulty;

/// What the caller asked for, fixed for the lifetime of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizRequest {
    pub command: String,
    pub model_path: String,
}

impl QuizRequest {
    pub fn new(command: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model_path: model_path.into(),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::mentioned_in(&self.command).unwrap_or(Difficulty::Beginner)
    }
}
