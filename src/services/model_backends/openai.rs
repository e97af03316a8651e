use std::path::Path;
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use async_openai::Client;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{ChatMessage, CompletionParams};
use crate::models::dto::QuizDocument;
use crate::services::model_service::{CompletionModel, ModelProvider};

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat completions against an OpenAI-compatible server hosting the model locally.
pub struct OpenAiChatProvider {
    client: Client<OpenAIConfig>,
    require_model_file: bool,
    structured_output: bool,
}

impl OpenAiChatProvider {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_base(config.api_base.clone())
            .with_api_key(config.api_key.expose_secret());

        Self {
            client: Client::with_config(openai_config),
            require_model_file: config.require_model_file,
            structured_output: config.structured_output,
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAiChatProvider {
    async fn load(&self, model_path: &str) -> AppResult<Arc<dyn CompletionModel>> {
        if model_path.trim().is_empty() {
            return Err(AppError::ModelLoad("modelPath is empty".to_string()));
        }

        if self.require_model_file && !Path::new(model_path).is_file() {
            return Err(AppError::ModelLoad(format!(
                "model file not found: {}",
                model_path
            )));
        }

        log::info!("Using OpenAI-compatible backend for model {}", model_path);

        Ok(Arc::new(OpenAiChatModel {
            client: self.client.clone(),
            model: model_path.to_string(),
            structured_output: self.structured_output,
        }))
    }
}

pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
    structured_output: bool,
}

#[async_trait]
impl CompletionModel for OpenAiChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> AppResult<String> {
        let body = build_request_body(&self.model, messages, params, self.structured_output);

        let response: ChatCompletionBody = self
            .client
            .chat()
            .create_byot(body)
            .await
            .map_err(|e| {
                log::error!("Chat completion request failed: {}", e);
                AppError::Generation(e.to_string())
            })?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            log::error!("No choices in response");
            AppError::Generation("API response contained no choices".to_string())
        })?;

        if let Some(reason) = &choice.finish_reason {
            log::debug!("Completion finished with reason: {}", reason);
        }

        choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| AppError::Generation("choice contained no message content".to_string()))
    }
}

// `top_k` is not part of the OpenAI schema but llama.cpp-style servers accept it,
// so the body is sent as plain JSON.
fn build_request_body(
    model: &str,
    messages: &[ChatMessage],
    params: &CompletionParams,
    structured_output: bool,
) -> serde_json::Value {
    let mut body = json!({
        "model": model,
        "messages": messages,
        "max_tokens": params.max_tokens,
        "temperature": params.temperature,
        "top_p": params.top_p,
        "top_k": params.top_k,
        "stop": params.stop_sequences,
        "stream": false,
    });

    if structured_output {
        body["response_format"] = json!({
            "type": "json_schema",
            "json_schema": {
                "name": "quiz_document",
                "schema": QuizDocument::json_schema(),
            },
        });
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::services::prompt_builder::PromptBuilder;

    #[test]
    fn request_body_carries_generation_params() {
        let messages = PromptBuilder::build("because");
        let body = build_request_body("m.gguf", &messages, &CompletionParams::default(), false);

        assert_eq!(body["model"], "m.gguf");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["top_k"], 40);
        assert_eq!(body["stream"], false);

        let stops: Vec<&str> = body["stop"]
            .as_array()
            .expect("stop is an array")
            .iter()
            .filter_map(|s| s.as_str())
            .collect();
        assert!(stops.contains(&"<end_of_turn>"));
        assert!(stops.contains(&"```"));
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn structured_output_adds_json_schema() {
        let messages = PromptBuilder::build("because");
        let body = build_request_body("m.gguf", &messages, &CompletionParams::default(), true);

        assert_eq!(body["response_format"]["type"], "json_schema");
        assert!(body["response_format"]["json_schema"]["schema"].is_object());
    }

    #[tokio::test]
    async fn load_rejects_missing_model_file() {
        let provider = OpenAiChatProvider::new(&Config::test_config());

        let err = match provider.load("definitely/not/here.gguf").await {
            Ok(_) => panic!("load should fail"),
            Err(e) => e,
        };
        assert_eq!(err.kind(), ErrorKind::ModelLoadFailure);
        assert!(err.to_string().contains("definitely/not/here.gguf"));
    }

    #[tokio::test]
    async fn load_without_file_check_only_rejects_empty_path() {
        let config = Config {
            require_model_file: false,
            ..Config::test_config()
        };
        let provider = OpenAiChatProvider::new(&config);

        assert!(provider.load("  ").await.is_err());
        assert!(provider.load("gemma-3-1b-it").await.is_ok());
    }
}
