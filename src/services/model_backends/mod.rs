pub mod fixture;
pub mod openai;

use std::sync::Arc;

pub use fixture::FixtureProvider;
pub use openai::OpenAiChatProvider;

use crate::config::{BackendKind, Config};
use crate::services::model_service::ModelProvider;

pub fn provider_from_config(config: &Config) -> Arc<dyn ModelProvider> {
    match config.backend {
        BackendKind::OpenAi => Arc::new(OpenAiChatProvider::new(config)),
        BackendKind::Fixture => Arc::new(FixtureProvider),
    }
}
