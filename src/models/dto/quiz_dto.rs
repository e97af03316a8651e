use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::Quiz;

/// The document the model is asked to produce.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct QuizDocument {
    pub quiz: Quiz,
}

impl QuizDocument {
    /// JSON schema of the document, for servers that can constrain decoding to it.
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(QuizDocument);
        serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null)
    }
}
