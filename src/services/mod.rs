pub mod json_extractor;
pub mod model_backends;
pub mod model_service;
pub mod prompt_builder;
pub mod quiz_pipeline;
pub mod quiz_validator;

pub use json_extractor::{ExtractionPolicy, JsonExtractor};
pub use model_service::{CompletionGateway, CompletionModel, ModelProvider};
pub use prompt_builder::PromptBuilder;
pub use quiz_pipeline::{PipelineStage, QuizPipeline};
pub use quiz_validator::{QuizValidator, ValidatedQuiz};
