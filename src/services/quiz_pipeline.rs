use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{CompletionParams, QuizRequest};
use crate::models::dto::{ErrorRecord, QuizRequestDto, ResultEnvelope};
use crate::services::json_extractor::JsonExtractor;
use crate::services::model_backends::provider_from_config;
use crate::services::model_service::{CompletionGateway, ModelProvider};
use crate::services::prompt_builder::PromptBuilder;
use crate::services::quiz_validator::{QuizValidator, ValidatedQuiz};

/// Where a run is. Any stage may jump straight to `Done` on failure; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    ModelLoading,
    Generating,
    Extracting,
    Validating,
    Done,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Idle => write!(f, "idle"),
            PipelineStage::ModelLoading => write!(f, "model_loading"),
            PipelineStage::Generating => write!(f, "generating"),
            PipelineStage::Extracting => write!(f, "extracting"),
            PipelineStage::Validating => write!(f, "validating"),
            PipelineStage::Done => write!(f, "done"),
        }
    }
}

struct PipelineRun {
    run_id: String,
    stage: PipelineStage,
    raw_response: Option<String>,
}

impl PipelineRun {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            stage: PipelineStage::Idle,
            raw_response: None,
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        log::debug!("run {}: {} -> {}", self.run_id, self.stage, next);
        self.stage = next;
    }
}

/// Load, generate, extract, validate; one envelope per request.
pub struct QuizPipeline {
    provider: Arc<dyn ModelProvider>,
    params: CompletionParams,
    timeout: Duration,
    extractor: JsonExtractor,
}

impl QuizPipeline {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        params: CompletionParams,
        timeout: Duration,
        extractor: JsonExtractor,
    ) -> Self {
        Self {
            provider,
            params,
            timeout,
            extractor,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            provider_from_config(config),
            config.completion_params(),
            config.timeout(),
            JsonExtractor::new(config.extraction),
        )
    }

    /// Parses the raw input document and runs it. A request that cannot be
    /// read yields an `UnexpectedFailure` envelope.
    pub async fn handle_input(&self, input: &str) -> ResultEnvelope {
        let request = QuizRequestDto::from_json(input).map(QuizRequest::from);

        match request {
            Ok(request) => self.run(&request).await,
            Err(err) => {
                log::error!("Rejected request: {}", err);
                ResultEnvelope::Err(ErrorRecord::from_error(
                    &err,
                    PipelineStage::Idle,
                    None,
                    None,
                ))
            }
        }
    }

    pub async fn run(&self, request: &QuizRequest) -> ResultEnvelope {
        let mut run = PipelineRun::new();
        log::info!(
            "run {}: command={:?} modelPath={} difficulty={}",
            run.run_id,
            request.command,
            request.model_path,
            request.difficulty().as_str()
        );

        let envelope = match self.execute(request, &mut run).await {
            Ok(validated) => {
                log::info!(
                    "run {}: quiz {} with {} sentences and {} questions",
                    run.run_id,
                    validated.quiz.id,
                    validated.quiz.sentences.len(),
                    validated.quiz.questions.len()
                );
                ResultEnvelope::ok(validated.quiz, validated.warnings)
            }
            Err(err) => {
                log::error!("run {} failed while {}: {}", run.run_id, run.stage, err);
                ResultEnvelope::Err(ErrorRecord::from_error(
                    &err,
                    run.stage,
                    Some(request),
                    run.raw_response.as_deref(),
                ))
            }
        };

        run.advance(PipelineStage::Done);
        envelope
    }

    async fn execute(&self, request: &QuizRequest, run: &mut PipelineRun) -> AppResult<ValidatedQuiz> {
        run.advance(PipelineStage::ModelLoading);
        let model = self.provider.load(&request.model_path).await?;

        run.advance(PipelineStage::Generating);
        let messages = PromptBuilder::build(&request.command);
        let gateway = CompletionGateway::new(model, self.params.clone(), self.timeout);
        let text = gateway.complete(&messages).await?;

        log::info!("--- RAW LLM OUTPUT START ---\n{}\n--- RAW LLM OUTPUT END ---", text);
        let raw = run.raw_response.insert(text).clone();

        run.advance(PipelineStage::Extracting);
        let extracted = self.extractor.extract(&raw).ok_or(AppError::JsonNotFound)?;
        log::debug!(
            "run {}: extracted {} bytes ({:?})",
            run.run_id,
            extracted.text.len(),
            extracted.strategy
        );

        run.advance(PipelineStage::Validating);
        QuizValidator::validate(extracted.text)
    }
}
