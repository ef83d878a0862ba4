use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::jobs::fit_scoring::FitScorer;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// `None` when `LLM_PROVIDER` is disabled; generation then uses templates only.
    pub llm: Option<LlmClient>,
    pub config: Config,
    /// Pluggable fit scorer. Default: KeywordFitScorer.
    pub fit_scorer: Arc<dyn FitScorer>,
}
