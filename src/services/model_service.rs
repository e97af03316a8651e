use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{ChatMessage, CompletionParams};

/// A loaded model that turns a conversation into generated text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> AppResult<String>;
}

/// Resolves a model locator into a ready [`CompletionModel`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn load(&self, model_path: &str) -> AppResult<Arc<dyn CompletionModel>>;
}

/// Issues the single completion call of a run with fixed parameters and a deadline.
pub struct CompletionGateway {
    model: Arc<dyn CompletionModel>,
    params: CompletionParams,
    timeout: Duration,
}

impl CompletionGateway {
    pub fn new(model: Arc<dyn CompletionModel>, params: CompletionParams, timeout: Duration) -> Self {
        Self {
            model,
            params,
            timeout,
        }
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> AppResult<String> {
        log::debug!(
            "Requesting completion: {} messages, max_tokens={}, temperature={}, top_p={}, top_k={}",
            messages.len(),
            self.params.max_tokens,
            self.params.temperature,
            self.params.top_p,
            self.params.top_k
        );

        let text = tokio::time::timeout(self.timeout, self.model.complete(messages, &self.params))
            .await
            .map_err(|_| {
                log::warn!("Completion exceeded {:?}", self.timeout);
                AppError::Timeout(self.timeout)
            })??;

        if text.trim().is_empty() {
            return Err(AppError::Generation(
                "model returned an empty completion".to_string(),
            ));
        }

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::services::prompt_builder::PromptBuilder;

    fn gateway(model: MockCompletionModel, timeout: Duration) -> CompletionGateway {
        CompletionGateway::new(Arc::new(model), CompletionParams::default(), timeout)
    }

    #[tokio::test]
    async fn complete_forwards_messages_and_params() {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .withf(|messages, params| {
                messages.len() == 2
                    && params.max_tokens == 500
                    && params.stop_sequences.contains("<end_of_turn>")
            })
            .times(1)
            .returning(|_, _| Ok("  {\"quiz\": {}}\n".to_string()));

        let text = gateway(model, Duration::from_secs(5))
            .complete(&PromptBuilder::build("because"))
            .await
            .expect("completion should succeed");

        assert_eq!(text, "{\"quiz\": {}}");
    }

    #[tokio::test]
    async fn empty_completion_is_generation_failure() {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .returning(|_, _| Ok("   ".to_string()));

        let err = gateway(model, Duration::from_secs(5))
            .complete(&PromptBuilder::build("because"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GenerationFailure);
    }

    #[tokio::test]
    async fn backend_error_is_propagated() {
        let mut model = MockCompletionModel::new();
        model
            .expect_complete()
            .returning(|_, _| Err(AppError::Generation("no choices in response".to_string())));

        let err = gateway(model, Duration::from_secs(5))
            .complete(&PromptBuilder::build("because"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GenerationFailure);
        assert!(err.to_string().contains("no choices"));
    }

    struct SlowModel;

    #[async_trait]
    impl CompletionModel for SlowModel {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _params: &CompletionParams,
        ) -> AppResult<String> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok("{}".to_string())
        }
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let gateway = CompletionGateway::new(
            Arc::new(SlowModel),
            CompletionParams::default(),
            Duration::from_millis(50),
        );

        let err = gateway
            .complete(&PromptBuilder::build("because"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Timeout(_)));
        assert_eq!(err.kind(), ErrorKind::GenerationFailure);
    }
}
