use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{ChatMessage, CompletionParams};
use crate::services::model_service::{CompletionModel, ModelProvider};

/// Treats `modelPath` as a file of recorded model output and replays it.
pub struct FixtureProvider;

#[async_trait]
impl ModelProvider for FixtureProvider {
    async fn load(&self, model_path: &str) -> AppResult<Arc<dyn CompletionModel>> {
        if model_path.trim().is_empty() {
            return Err(AppError::ModelLoad("modelPath is empty".to_string()));
        }

        let response = tokio::fs::read_to_string(model_path).await.map_err(|e| {
            log::error!("Failed to read fixture {}: {}", model_path, e);
            AppError::ModelLoad(format!("{}: {}", model_path, e))
        })?;

        log::info!("Loaded fixture {} ({} bytes)", model_path, response.len());

        Ok(Arc::new(FixtureModel { response }))
    }
}

pub struct FixtureModel {
    response: String,
}

#[async_trait]
impl CompletionModel for FixtureModel {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _params: &CompletionParams,
    ) -> AppResult<String> {
        Ok(self.response.clone())
    }
}
