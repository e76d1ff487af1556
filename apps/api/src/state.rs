use std::sync::Arc;

use sqlx::PgPool;

use crate::humanize::{HumanizeSettings, Rewriter};
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Chunk rewriting backend. Default: `HumanizerClient`.
    pub rewriter: Arc<dyn Rewriter>,
    /// LLM used for content generation and length correction. Default: `LlmClient`.
    pub generator: Arc<dyn TextGenerator>,
    pub humanize: HumanizeSettings,
}

