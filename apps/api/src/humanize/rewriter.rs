//! Chunk rewriter adapter — wraps the external rewriting service.
//!
//! `Rewriter` is the seam: `HumanizerClient` talks to the real service, tests swap
//! in their own implementations. `rewrite_chunk` turns every failure into a
//! pass-through so the pipeline always has text to work with.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::humanize::word_count;

#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rewriter returned status {0}")]
    Status(u16),

    #[error("Rewriter returned an empty body")]
    EmptyBody,
}

/// A text-rewriting backend. Returns the rewritten text or why it could not.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<String, RewriteError>;
}

/// Account credentials for the rewriting service. Always injected from config.
#[derive(Clone)]
pub struct HumanizerCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for HumanizerCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HumanizerCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// HTTP client for the form-based rewriting endpoint.
#[derive(Clone)]
pub struct HumanizerClient {
    client: Client,
    api_url: String,
    credentials: HumanizerCredentials,
}

impl HumanizerClient {
    pub fn new(
        api_url: String,
        credentials: HumanizerCredentials,
        timeout: Duration,
    ) -> Result<Self, RewriteError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            credentials,
        })
    }
}

#[async_trait]
impl Rewriter for HumanizerClient {
    async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
        let form = [
            ("email", self.credentials.email.as_str()),
            ("pw", self.credentials.password.as_str()),
            ("text", text),
        ];

        let response = self.client.post(&self.api_url).form(&form).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RewriteError::Status(status.as_u16()));
        }

        // The service answers with the rewritten text directly, not JSON.
        let body = response.text().await?;
        let body = body.trim();
        if body.is_empty() {
            return Err(RewriteError::EmptyBody);
        }
        Ok(body.to_string())
    }
}

/// Outcome of sending one chunk through the rewriter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRewrite {
    pub text: String,
    pub success: bool,
    pub original_words: usize,
    pub rewritten_words: usize,
}

impl ChunkRewrite {
    fn pass_through(chunk: &str, success: bool) -> Self {
        let words = word_count(chunk);
        Self {
            text: chunk.to_string(),
            success,
            original_words: words,
            rewritten_words: words,
        }
    }
}

/// Rewrites one chunk. Never fails: on any error the original chunk is returned
/// unchanged with `success = false`.
pub async fn rewrite_chunk(rewriter: &dyn Rewriter, chunk: &str) -> ChunkRewrite {
    if word_count(chunk) == 0 {
        // Nothing to rewrite.
        return ChunkRewrite::pass_through(chunk, true);
    }

    match rewriter.rewrite(chunk).await {
        Ok(rewritten) if !rewritten.trim().is_empty() => {
            let rewritten = rewritten.trim().to_string();
            let result = ChunkRewrite {
                original_words: word_count(chunk),
                rewritten_words: word_count(&rewritten),
                text: rewritten,
                success: true,
            };
            debug!(
                original = result.original_words,
                rewritten = result.rewritten_words,
                "Chunk rewritten"
            );
            result
        }
        Ok(_) => {
            warn!("Rewriter returned blank text; keeping original chunk");
            ChunkRewrite::pass_through(chunk, false)
        }
        Err(e) => {
            warn!("Rewriter failed ({e}); keeping original chunk");
            ChunkRewrite::pass_through(chunk, false)
        }
    }
}
