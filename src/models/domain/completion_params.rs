use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_TOP_K: u32 = 40;

/// Gemma's turn marker, code fences and chat-transcript prefixes. Generation stops
/// at the first of these so trailing commentary is cut instead of appended.
pub const DEFAULT_STOP_SEQUENCES: [&str; 4] = ["<end_of_turn>", "```", "Human:", "Assistant:"];

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompletionParams {
    #[validate(range(min = 1))]
    pub max_tokens: u32,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub top_p: f32,
    #[validate(range(min = 1))]
    pub top_k: u32,
    pub stop_sequences: BTreeSet<String>,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            stop_sequences: DEFAULT_STOP_SEQUENCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = CompletionParams::default();
        assert!(params.validate().is_ok());
        assert!(params.stop_sequences.contains("<end_of_turn>"));
        assert!(params.stop_sequences.contains("```"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let params = CompletionParams {
            temperature: 2.5,
            ..CompletionParams::default()
        };
        assert!(params.validate().is_err());

        let params = CompletionParams {
            top_p: 0.0,
            ..CompletionParams::default()
        };
        assert!(params.validate().is_err());

        let params = CompletionParams {
            max_tokens: 0,
            ..CompletionParams::default()
        };
        assert!(params.validate().is_err());
    }
}
