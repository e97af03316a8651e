use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("No JSON object found in model output")]
    JsonNotFound,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Schema error at `{field}`: {reason}")]
    Schema { field: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Failure taxonomy reported on the output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ModelLoadFailure,
    GenerationFailure,
    ParseFailure,
    SchemaFailure,
    UnexpectedFailure,
}

impl ErrorKind {
    /// Every kind except `UnexpectedFailure` is a reported outcome, not a crash.
    pub fn is_reported(&self) -> bool {
        !matches!(self, ErrorKind::UnexpectedFailure)
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_reported() {
            0
        } else {
            1
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ModelLoadFailure => write!(f, "ModelLoadFailure"),
            ErrorKind::GenerationFailure => write!(f, "GenerationFailure"),
            ErrorKind::ParseFailure => write!(f, "ParseFailure"),
            ErrorKind::SchemaFailure => write!(f, "SchemaFailure"),
            ErrorKind::UnexpectedFailure => write!(f, "UnexpectedFailure"),
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ModelLoad(_) => ErrorKind::ModelLoadFailure,
            AppError::Generation(_) | AppError::Timeout(_) => ErrorKind::GenerationFailure,
            AppError::JsonNotFound | AppError::InvalidJson(_) => ErrorKind::ParseFailure,
            AppError::Schema { .. } => ErrorKind::SchemaFailure,
            AppError::InvalidRequest(_) | AppError::InternalError(_) => {
                ErrorKind::UnexpectedFailure
            }
        }
    }

    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidJson(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("I/O error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
