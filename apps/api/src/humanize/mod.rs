//! Content humanization — rewrites generated markdown through an external
//! rewriting service while keeping its heading structure and target length.
//!
//! Flow: sectionize → rewrite bodies chunk by chunk → reassemble → reconcile length.
//! All LLM calls go through `llm_client::TextGenerator`; all rewriter calls go
//! through the `Rewriter` trait.

pub mod chunker;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod reconcile;
pub mod rewriter;
pub mod sections;
pub mod store;

use serde::{Deserialize, Serialize};

pub use pipeline::{humanize, ChunkStat, HumanizationResult};
pub use rewriter::{HumanizerClient, HumanizerCredentials, Rewriter};

/// Tunables for one humanization run. `Default` matches the production constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizeSettings {
    /// Upper bound on words sent to the rewriter in one request.
    pub chunk_words: usize,
    /// Bodies with this many words or fewer are passed through untouched.
    pub min_body_words: usize,
    /// Shortfall (in words) above which a continuation is requested.
    pub expansion_threshold: usize,
    /// Max in-flight rewriter calls. 1 means strictly sequential.
    pub concurrency: usize,
}

impl Default for HumanizeSettings {
    fn default() -> Self {
        Self {
            chunk_words: 1000,
            min_body_words: 10,
            expansion_threshold: 100,
            concurrency: 1,
        }
    }
}

/// Naive whitespace word count, the unit used for every statistic in this module.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
