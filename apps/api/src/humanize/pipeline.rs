//! Humanization pipeline — orchestrates one run over a markdown document.
//!
//! Flow: sectionize → plan chunks per section → rewrite chunks (in order, or with
//! bounded concurrency) → fold outcomes into sections + stats → reassemble →
//! reconcile length.
//!
//! Chunk indices always reflect document position, never completion order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::humanize::chunker::split_into_chunks;
use crate::humanize::reconcile::{accuracy_percent, reconcile_length};
use crate::humanize::rewriter::{rewrite_chunk, ChunkRewrite, Rewriter};
use crate::humanize::sections::{reassemble, sectionize, Section};
use crate::humanize::{word_count, HumanizeSettings};
use crate::llm_client::TextGenerator;

/// Label used in stats for the headingless first section.
pub const PREAMBLE_LABEL: &str = "Introduction";

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Per-chunk statistics, one per rewriter request, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkStat {
    /// 1-based, monotonic across the whole document.
    pub chunk_index: usize,
    pub section_label: String,
    pub original_word_count: usize,
    pub rewritten_word_count: usize,
    /// Positive when the rewrite is shorter, negative when it grew.
    pub reduction_percent: f64,
    pub success: bool,
}

impl ChunkStat {
    fn new(chunk_index: usize, section_label: &str, rewrite: &ChunkRewrite) -> Self {
        let reduction_percent = if rewrite.original_words == 0 {
            0.0
        } else {
            (rewrite.original_words as f64 - rewrite.rewritten_words as f64)
                / rewrite.original_words as f64
                * 100.0
        };
        Self {
            chunk_index,
            section_label: section_label.to_string(),
            original_word_count: rewrite.original_words,
            rewritten_word_count: rewrite.rewritten_words,
            reduction_percent,
            success: rewrite.success,
        }
    }
}

/// Everything a caller needs from one run. Word counts exclude heading lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanizationResult {
    pub content: String,
    pub original_words: usize,
    pub target_words: usize,
    /// Body words after rewriting, before any continuation.
    pub rewritten_words: usize,
    pub final_words: usize,
    pub chunks_processed: usize,
    pub sections_processed: usize,
    pub accuracy_percent: f64,
    pub chunk_stats: Vec<ChunkStat>,
    pub expanded: bool,
    pub expansion_words: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Humanizes `document`. `target_words` defaults to the document's own body word count.
///
/// Never fails: rewriter errors degrade to pass-through chunks and a failed
/// continuation leaves the document unexpanded.
pub async fn humanize(
    document: &str,
    target_words: Option<usize>,
    rewriter: Arc<dyn Rewriter>,
    generator: &dyn TextGenerator,
    settings: &HumanizeSettings,
) -> HumanizationResult {
    let sections = sectionize(document);
    let original_words: usize = sections.iter().map(|s| word_count(&s.body)).sum();
    let target_words = target_words.unwrap_or(original_words);

    let plans: Vec<Vec<String>> = sections
        .iter()
        .map(|s| plan_chunks(&s.body, settings))
        .collect();
    let total_chunks: usize = plans.iter().map(Vec::len).sum();

    info!(
        sections = sections.len(),
        chunks = total_chunks,
        original_words,
        target_words,
        "Starting humanization"
    );

    let rewrites = rewrite_all(&plans, rewriter, settings.concurrency).await;

    let outcomes: Vec<SectionOutcome> = sections
        .into_iter()
        .zip(rewrites)
        .map(|(section, rewrites)| SectionOutcome { section, rewrites })
        .collect();
    let summary = summarize(outcomes);

    let failed = summary.chunk_stats.iter().filter(|s| !s.success).count();
    if failed > 0 {
        warn!(
            failed,
            total = summary.chunk_stats.len(),
            "Some chunks could not be rewritten and were kept as-is"
        );
    }

    let reassembled = reassemble(&summary.sections);
    let style_sample = summary
        .sections
        .iter()
        .rev()
        .find(|s| !s.body.trim().is_empty())
        .map(|s| s.body.as_str())
        .unwrap_or("");

    let reconciled = reconcile_length(
        reassembled,
        target_words,
        style_sample,
        settings.expansion_threshold,
        generator,
    )
    .await;

    let result = HumanizationResult {
        accuracy_percent: accuracy_percent(reconciled.final_words, target_words),
        content: reconciled.content,
        original_words,
        target_words,
        rewritten_words: summary.rewritten_words,
        final_words: reconciled.final_words,
        chunks_processed: summary.chunk_stats.len(),
        sections_processed: summary.sections.len(),
        chunk_stats: summary.chunk_stats,
        expanded: reconciled.expanded,
        expansion_words: reconciled.expansion_words,
    };

    info!(
        final_words = result.final_words,
        accuracy = result.accuracy_percent,
        expanded = result.expanded,
        "Humanization complete"
    );

    result
}

/// Chunks to send for one section body; empty when the body is passed through.
fn plan_chunks(body: &str, settings: &HumanizeSettings) -> Vec<String> {
    if word_count(body) <= settings.min_body_words {
        return Vec::new();
    }
    split_into_chunks(body, settings.chunk_words)
}

/// Rewrites every planned chunk, returning results in the same shape and order as `plans`.
async fn rewrite_all(
    plans: &[Vec<String>],
    rewriter: Arc<dyn Rewriter>,
    concurrency: usize,
) -> Vec<Vec<ChunkRewrite>> {
    if concurrency <= 1 {
        let mut results = Vec::with_capacity(plans.len());
        for chunks in plans {
            let mut section_results = Vec::with_capacity(chunks.len());
            for chunk in chunks {
                section_results.push(rewrite_chunk(rewriter.as_ref(), chunk).await);
            }
            results.push(section_results);
        }
        return results;
    }

    let permits = Arc::new(Semaphore::new(concurrency));
    let handles: Vec<Vec<_>> = plans
        .iter()
        .map(|chunks| {
            chunks
                .iter()
                .map(|chunk| {
                    let rewriter = Arc::clone(&rewriter);
                    let permits = Arc::clone(&permits);
                    let chunk = chunk.clone();
                    tokio::spawn(async move {
                        let _permit = permits.acquire_owned().await.ok();
                        rewrite_chunk(rewriter.as_ref(), &chunk).await
                    })
                })
                .collect()
        })
        .collect();

    let mut results = Vec::with_capacity(plans.len());
    for (chunks, section_handles) in plans.iter().zip(handles) {
        let mut section_results = Vec::with_capacity(chunks.len());
        for (chunk, handle) in chunks.iter().zip(section_handles) {
            let rewrite = match handle.await {
                Ok(rewrite) => rewrite,
                Err(e) => {
                    warn!("Chunk rewrite task failed ({e}); keeping original chunk");
                    ChunkRewrite {
                        text: chunk.clone(),
                        success: false,
                        original_words: word_count(chunk),
                        rewritten_words: word_count(chunk),
                    }
                }
            };
            section_results.push(rewrite);
        }
        results.push(section_results);
    }
    results
}

// ────────────────────────────────────────────────────────────────────────────
// Fold
// ────────────────────────────────────────────────────────────────────────────

/// A section together with its chunk rewrites. No rewrites means the body is kept as-is.
struct SectionOutcome {
    section: Section,
    rewrites: Vec<ChunkRewrite>,
}

impl SectionOutcome {
    fn label(&self) -> &str {
        if self.section.has_heading() {
            &self.section.heading_text
        } else {
            PREAMBLE_LABEL
        }
    }

    fn rewritten_words(&self) -> usize {
        if self.rewrites.is_empty() {
            word_count(&self.section.body)
        } else {
            self.rewrites.iter().map(|r| r.rewritten_words).sum()
        }
    }

    fn processed_section(&self) -> Section {
        if self.rewrites.is_empty() {
            return self.section.clone();
        }
        let body = self
            .rewrites
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Section {
            body,
            ..self.section.clone()
        }
    }
}

struct RunSummary {
    sections: Vec<Section>,
    chunk_stats: Vec<ChunkStat>,
    rewritten_words: usize,
}

fn summarize(outcomes: Vec<SectionOutcome>) -> RunSummary {
    let chunk_stats = outcomes
        .iter()
        .flat_map(|o| o.rewrites.iter().map(move |r| (o.label(), r)))
        .enumerate()
        .map(|(i, (label, rewrite))| ChunkStat::new(i + 1, label, rewrite))
        .collect();

    RunSummary {
        rewritten_words: outcomes.iter().map(SectionOutcome::rewritten_words).sum(),
        sections: outcomes.iter().map(SectionOutcome::processed_section).collect(),
        chunk_stats,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::humanize::rewriter::RewriteError;
    use crate::llm_client::LlmError;

    fn words(prefix: &str, n: usize) -> String {
        (1..=n)
            .map(|i| format!("{prefix}{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Returns its input unchanged and records what it was sent.
    #[derive(Default)]
    struct EchoRewriter {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Rewriter for EchoRewriter {
        async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(text.to_string())
        }
    }

    /// Keeps the first half of the words.
    struct HalvingRewriter;

    #[async_trait]
    impl Rewriter for HalvingRewriter {
        async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
            let words: Vec<&str> = text.split_whitespace().collect();
            Ok(words[..words.len() / 2].join(" "))
        }
    }

    struct DownRewriter;

    #[async_trait]
    impl Rewriter for DownRewriter {
        async fn rewrite(&self, _text: &str) -> Result<String, RewriteError> {
            Err(RewriteError::Status(500))
        }
    }

    /// Echoes input, but finishes chunks whose first word sorts earlier *later*.
    struct SlowFirstRewriter;

    #[async_trait]
    impl Rewriter for SlowFirstRewriter {
        async fn rewrite(&self, text: &str) -> Result<String, RewriteError> {
            let delay = if text.starts_with("a1 ") { 150 } else { 10 };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(text.to_uppercase())
        }
    }

    struct FixedGenerator {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedGenerator {
        fn new(reply: String) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        fn last_prompt(&self) -> Option<String> {
            self.prompts.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate_text(
            &self,
            prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_single_section_on_target() {
        let doc = "# Title\n\nThis is one paragraph with more than ten words in total for this test.";
        let generator = FixedGenerator::new(String::new());

        let result = humanize(
            doc,
            Some(14),
            Arc::new(EchoRewriter::default()),
            &generator,
            &HumanizeSettings::default(),
        )
        .await;

        assert_eq!(result.final_words, 14);
        assert_eq!(result.accuracy_percent, 100.0);
        assert!(!result.expanded);
        assert_eq!(result.chunks_processed, 1);
        assert_eq!(result.sections_processed, 1);
        assert_eq!(result.chunk_stats[0].section_label, "Title");
        assert_eq!(
            result.content,
            "# Title\n\nThis is one paragraph with more than ten words in total for this test."
        );
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_result_is_expanded_once() {
        let doc = words("w", 50);
        let generator = FixedGenerator::new(words("extra", 200));

        let result = humanize(
            &doc,
            Some(300),
            Arc::new(EchoRewriter::default()),
            &generator,
            &HumanizeSettings::default(),
        )
        .await;

        assert!(result.expanded);
        assert_eq!(result.rewritten_words, 50);
        assert_eq!(result.expansion_words, 200);
        assert_eq!(result.final_words, 250);
        assert_eq!(result.accuracy_percent, 83.3);
        assert_eq!(result.chunk_stats[0].section_label, PREAMBLE_LABEL);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_style_sample_skips_trailing_empty_heading() {
        let doc = format!("# Title\n{}\n\n## References", words("w", 50));
        let generator = FixedGenerator::new(words("extra", 400));

        let result = humanize(
            &doc,
            Some(500),
            Arc::new(EchoRewriter::default()),
            &generator,
            &HumanizeSettings::default(),
        )
        .await;

        assert!(result.expanded);
        assert_eq!(result.sections_processed, 2);
        let prompt = generator.last_prompt().unwrap();
        let exemplar = prompt
            .split("short sentences):\n")
            .nth(1)
            .and_then(|rest| rest.lines().next())
            .unwrap();
        assert!(exemplar.ends_with("w49 w50"));
    }

    #[tokio::test]
    async fn test_target_defaults_to_original_body_words() {
        let doc = format!("# Head\n{}", words("w", 40));
        let result = humanize(
            &doc,
            None,
            Arc::new(EchoRewriter::default()),
            &FixedGenerator::new(String::new()),
            &HumanizeSettings::default(),
        )
        .await;

        assert_eq!(result.original_words, 40);
        assert_eq!(result.target_words, 40);
        assert_eq!(result.accuracy_percent, 100.0);
    }

    #[tokio::test]
    async fn test_headings_and_short_bodies_are_untouched() {
        let caption = "![chart](chart.png)\n*Figure 1.*";
        let doc = format!(
            "# Guide  \n\n{}\n\n## Caption\n{caption}\n\n### Steps\n{}",
            words("a", 30),
            words("b", 25)
        );
        let rewriter = Arc::new(EchoRewriter::default());

        let result = humanize(
            &doc,
            None,
            rewriter.clone(),
            &FixedGenerator::new(String::new()),
            &HumanizeSettings::default(),
        )
        .await;

        for heading in ["# Guide  ", "## Caption", "### Steps"] {
            assert!(
                result.content.lines().any(|l| l == heading),
                "missing heading {heading:?}"
            );
        }
        assert!(result.content.contains(caption));

        let seen = rewriter.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|chunk| !chunk.contains('#')));
        assert!(seen.iter().all(|chunk| !chunk.contains("chart.png")));
        assert_eq!(result.sections_processed, 3);
        assert_eq!(result.chunks_processed, 2);
    }

    #[tokio::test]
    async fn test_chunk_index_is_global_and_bounded() {
        let doc = format!(
            "# One\n{}\n\n## Two\n{}",
            words("a", 2500),
            words("b", 1200)
        );
        let rewriter = Arc::new(EchoRewriter::default());

        let result = humanize(
            &doc,
            None,
            rewriter.clone(),
            &FixedGenerator::new(String::new()),
            &HumanizeSettings::default(),
        )
        .await;

        let indices: Vec<usize> = result.chunk_stats.iter().map(|s| s.chunk_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        let labels: Vec<&str> = result
            .chunk_stats
            .iter()
            .map(|s| s.section_label.as_str())
            .collect();
        assert_eq!(labels, vec!["One", "One", "One", "Two", "Two"]);

        let seen = rewriter.seen.lock().unwrap().clone();
        assert!(seen.iter().all(|chunk| word_count(chunk) <= 1000));
        assert_eq!(result.final_words, 3700);
    }

    #[tokio::test]
    async fn test_reduction_percent_and_rewritten_totals() {
        let doc = format!("# Section\n{}\n\n## Note\nKeep me.", words("w", 40));
        let result = humanize(
            &doc,
            None,
            Arc::new(HalvingRewriter),
            &FixedGenerator::new(String::new()),
            &HumanizeSettings::default(),
        )
        .await;

        let stat = &result.chunk_stats[0];
        assert_eq!(stat.original_word_count, 40);
        assert_eq!(stat.rewritten_word_count, 20);
        assert_eq!(stat.reduction_percent, 50.0);
        assert!(stat.success);
        // 20 rewritten + 2 words from the short "Keep me." body
        assert_eq!(result.rewritten_words, 22);
        assert_eq!(result.original_words, 42);
        // shortfall 20 is under the threshold
        assert!(!result.expanded);
        assert!(result.content.ends_with("## Note\n\nKeep me."));
    }

    #[tokio::test]
    async fn test_rewriter_outage_still_completes() {
        let body = words("w", 30);
        let doc = format!("# Title\n{body}");
        let generator = FixedGenerator::new(String::new());

        let result = humanize(
            &doc,
            None,
            Arc::new(DownRewriter),
            &generator,
            &HumanizeSettings::default(),
        )
        .await;

        assert_eq!(result.chunks_processed, 1);
        assert!(!result.chunk_stats[0].success);
        assert_eq!(result.chunk_stats[0].reduction_percent, 0.0);
        assert_eq!(result.content, format!("# Title\n\n{body}"));
        assert_eq!(result.final_words, 30);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_dispatch_preserves_document_order() {
        let doc = format!("# A\n{}\n\n# B\n{}", words("a", 25), words("b", 12));
        let settings = HumanizeSettings {
            chunk_words: 10,
            concurrency: 4,
            ..HumanizeSettings::default()
        };

        let result = humanize(
            &doc,
            None,
            Arc::new(SlowFirstRewriter),
            &FixedGenerator::new(String::new()),
            &settings,
        )
        .await;

        let indices: Vec<usize> = result.chunk_stats.iter().map(|s| s.chunk_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        let expected = format!(
            "# A\n\n{}\n\n# B\n\n{}",
            words("A", 25),
            words("B", 12)
        );
        assert_eq!(result.content, expected);
    }

    #[tokio::test]
    async fn test_empty_document() {
        let generator = FixedGenerator::new("should not be used".to_string());
        let result = humanize(
            "",
            None,
            Arc::new(EchoRewriter::default()),
            &generator,
            &HumanizeSettings::default(),
        )
        .await;

        assert_eq!(result.content, "");
        assert_eq!(result.sections_processed, 0);
        assert_eq!(result.chunks_processed, 0);
        assert_eq!(result.accuracy_percent, 0.0);
        assert_eq!(generator.calls(), 0);
    }
}
