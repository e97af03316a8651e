use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{AppError, ErrorKind};
use crate::models::domain::{Quiz, QuizRequest};
use crate::services::quiz_pipeline::PipelineStage;

pub const MODEL_LOAD_ERROR: &str = "Failed to load LLM model";
pub const GENERATION_ERROR: &str = "Failed to generate AI response";
pub const PARSE_ERROR: &str = "Failed to parse AI response as JSON";
pub const SCHEMA_ERROR: &str = "AI response did not match the quiz schema";
pub const UNEXPECTED_ERROR: &str = "Script execution failed";

/// Success body: `{ "quiz": {...} }`, plus `warning` when soft checks failed.
#[derive(Debug, Clone, Serialize)]
pub struct QuizPayload {
    pub quiz: Quiz,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Failure body: `{ "error": "...", <context fields> }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    #[serde(skip)]
    pub kind: ErrorKind,
    #[serde(skip)]
    pub stage: PipelineStage,
    #[serde(rename = "error")]
    pub message: String,
    #[serde(flatten)]
    pub context: BTreeMap<String, String>,
}

impl ErrorRecord {
    pub fn new(kind: ErrorKind, stage: PipelineStage, message: impl Into<String>) -> Self {
        Self {
            kind,
            stage,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// Builds the reported record for `err`, attaching the diagnostic fields for its kind.
    /// `raw_response` is the model text when one was produced.
    pub fn from_error(
        err: &AppError,
        stage: PipelineStage,
        request: Option<&QuizRequest>,
        raw_response: Option<&str>,
    ) -> Self {
        let kind = err.kind();
        let command = request.map(|r| r.command.clone()).unwrap_or_default();

        match kind {
            ErrorKind::ModelLoadFailure => ErrorRecord::new(kind, stage, MODEL_LOAD_ERROR)
                .with_context(
                    "modelPath",
                    request.map(|r| r.model_path.clone()).unwrap_or_default(),
                )
                .with_context("exception", err.to_string())
                .with_context(
                    "details",
                    "The LLM model could not be loaded. Please check the model file path and ensure the model is properly installed.",
                ),
            ErrorKind::GenerationFailure => ErrorRecord::new(kind, stage, GENERATION_ERROR)
                .with_context("command", command)
                .with_context("exception", err.to_string())
                .with_context(
                    "details",
                    "An error occurred while generating the AI response. Please try again.",
                ),
            ErrorKind::ParseFailure => {
                let record = ErrorRecord::new(kind, stage, PARSE_ERROR)
                    .with_context("aiResponse", raw_response.unwrap_or_default())
                    .with_context("command", command)
                    .with_context(
                        "details",
                        "The AI response could not be parsed as valid JSON. Please try a different prompt or check the AI response format.",
                    );
                match err {
                    AppError::InvalidJson(reason) => record.with_context("exception", reason.clone()),
                    _ => record,
                }
            }
            ErrorKind::SchemaFailure => {
                let field = match err {
                    AppError::Schema { field, .. } => field.clone(),
                    _ => String::new(),
                };
                ErrorRecord::new(kind, stage, SCHEMA_ERROR)
                    .with_context("field", field)
                    .with_context("aiResponse", raw_response.unwrap_or_default())
                    .with_context("command", command)
                    .with_context("details", err.to_string())
            }
            ErrorKind::UnexpectedFailure => ErrorRecord::new(kind, stage, UNEXPECTED_ERROR)
                .with_context("exception", err.to_string())
                .with_context(
                    "details",
                    "An unexpected error occurred while processing the request.",
                ),
        }
    }
}

/// The one document written to the output channel per run.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ResultEnvelope {
    Ok(QuizPayload),
    Err(ErrorRecord),
}

impl ResultEnvelope {
    pub fn ok(quiz: Quiz, warnings: Vec<String>) -> Self {
        let warning = if warnings.is_empty() {
            None
        } else {
            Some(warnings.join("; "))
        };
        ResultEnvelope::Ok(QuizPayload { quiz, warning })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResultEnvelope::Ok(_))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            ResultEnvelope::Ok(_) => None,
            ResultEnvelope::Err(record) => Some(record.kind),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.error_kind().map(|kind| kind.exit_code()).unwrap_or(0)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"error":"{}","exception":"serialization failed: {}"}}"#,
                UNEXPECTED_ERROR,
                e.to_string().replace('"', "'")
            )
        })
    }
}
