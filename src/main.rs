use std::io::Read;

use quiz_pipeline::config::Config;
use quiz_pipeline::errors::AppError;
use quiz_pipeline::models::dto::{ErrorRecord, ResultEnvelope};
use quiz_pipeline::services::{PipelineStage, QuizPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    log::debug!(
        "backend={:?} api_base={} timeout={}s extraction={:?}",
        config.backend,
        config.api_base,
        config.timeout_secs,
        config.extraction
    );

    let mut input = String::new();
    let envelope = match std::io::stdin().read_to_string(&mut input) {
        Ok(_) => {
            let pipeline = QuizPipeline::from_config(&config);
            // A panic inside the pipeline still has to produce an envelope.
            match tokio::spawn(async move { pipeline.handle_input(&input).await }).await {
                Ok(envelope) => envelope,
                Err(e) => unexpected(AppError::InternalError(format!("pipeline task failed: {}", e))),
            }
        }
        Err(e) => unexpected(e.into()),
    };

    println!("{}", envelope.to_json());
    std::process::exit(envelope.exit_code());
}

fn unexpected(err: AppError) -> ResultEnvelope {
    log::error!("{}", err);
    ResultEnvelope::Err(ErrorRecord::from_error(&err, PipelineStage::Idle, None, None))
}
