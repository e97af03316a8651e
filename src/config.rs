use std::env;
use std::time::Duration;

use secrecy::SecretString;
use validator::Validate;

use crate::models::domain::completion_params::{
    CompletionParams, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P,
};
use crate::services::json_extractor::ExtractionPolicy;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/v1";
pub const DEFAULT_API_KEY: &str = "sk-no-key-required";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug, PartialEq, Eq, Copy)]
pub enum BackendKind {
    /// OpenAI-compatible chat server, e.g. a local llama.cpp server.
    OpenAi,
    /// Replays the file at `modelPath` as the completion.
    Fixture,
}

impl BackendKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Some(BackendKind::OpenAi),
            "fixture" => Some(BackendKind::Fixture),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub backend: BackendKind,
    pub api_base: String,
    pub api_key: SecretString,
    pub require_model_file: bool,
    pub structured_output: bool,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub extraction: ExtractionPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            backend: env::var("LLM_BACKEND")
                .ok()
                .and_then(|b| BackendKind::parse(&b))
                .unwrap_or(BackendKind::OpenAi),
            api_base: env::var("LLM_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            api_key: SecretString::from(
                env::var("LLM_API_KEY").unwrap_or_else(|_| DEFAULT_API_KEY.to_string()),
            ),
            require_model_file: env_parse("LLM_REQUIRE_MODEL_FILE").unwrap_or(true),
            structured_output: env_parse("LLM_STRUCTURED_OUTPUT").unwrap_or(false),
            timeout_secs: timeout_secs(env_parse("LLM_TIMEOUT_SECS")),
            max_tokens: env_parse("LLM_MAX_TOKENS").unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: env_parse("LLM_TEMPERATURE").unwrap_or(DEFAULT_TEMPERATURE),
            top_p: env_parse("LLM_TOP_P").unwrap_or(DEFAULT_TOP_P),
            top_k: env_parse("LLM_TOP_K").unwrap_or(DEFAULT_TOP_K),
            extraction: env::var("LLM_EXTRACTION")
                .ok()
                .and_then(|p| ExtractionPolicy::parse(&p))
                .unwrap_or_default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Generation parameters, or the defaults if the configured set is out of range.
    pub fn completion_params(&self) -> CompletionParams {
        let params = CompletionParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            ..CompletionParams::default()
        };

        match params.validate() {
            Ok(()) => params,
            Err(err) => {
                log::warn!("Ignoring invalid generation parameters ({}), using defaults", err);
                CompletionParams::default()
            }
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            backend: BackendKind::Fixture,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: SecretString::from(DEFAULT_API_KEY.to_string()),
            require_model_file: true,
            structured_output: false,
            timeout_secs: 5,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            extraction: ExtractionPolicy::Balanced,
        }
    }
}

// A zero deadline would fail every run.
fn timeout_secs(configured: Option<u64>) -> u64 {
    match configured {
        Some(0) => {
            log::warn!("Ignoring LLM_TIMEOUT_SECS=0, using {}s", DEFAULT_TIMEOUT_SECS);
            DEFAULT_TIMEOUT_SECS
        }
        Some(secs) => secs,
        None => DEFAULT_TIMEOUT_SECS,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
