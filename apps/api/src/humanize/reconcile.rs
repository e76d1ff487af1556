//! Length reconciliation — asks the LLM for a continuation when rewriting left the
//! document materially short of its target word count.
//!
//! A single continuation request is made; there is no loop to convergence and no
//! trimming when the document overshoots.

use tracing::{info, warn};

use crate::humanize::prompts::{EXPANSION_PROMPT_TEMPLATE, EXPANSION_TEMPERATURE};
use crate::humanize::sections::content_word_count;
use crate::llm_client::prompts::{
    fill_template, PLAIN_OUTPUT_INSTRUCTION, SIMPLE_REGISTER_INSTRUCTION,
};
use crate::llm_client::TextGenerator;

const STYLE_SAMPLE_CHARS: usize = 300;
const DOCUMENT_TAIL_CHARS: usize = 500;
/// Tokens requested per missing word.
const TOKENS_PER_WORD: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub content: String,
    /// Body words before any continuation was appended.
    pub current_words: usize,
    pub final_words: usize,
    pub expanded: bool,
    pub expansion_words: usize,
}

/// Compares `document` against `target_words` and appends one LLM continuation
/// when the shortfall exceeds `threshold`.
///
/// `style_sample` is the last rewritten section body, used as a style exemplar.
/// A failed or empty continuation leaves the document as it was (`expanded = false`).
pub async fn reconcile_length(
    document: String,
    target_words: usize,
    style_sample: &str,
    threshold: usize,
    generator: &dyn TextGenerator,
) -> Reconciliation {
    let current_words = content_word_count(&document);
    let unexpanded = |content: String| Reconciliation {
        content,
        current_words,
        final_words: current_words,
        expanded: false,
        expansion_words: 0,
    };

    let shortfall = target_words.saturating_sub(current_words);
    if shortfall <= threshold {
        return unexpanded(document);
    }

    info!(
        current = current_words,
        target = target_words,
        shortfall,
        "Document short of target, requesting continuation"
    );

    let prompt = build_expansion_prompt(&document, style_sample, shortfall);
    let max_tokens = u32::try_from(shortfall.saturating_mul(TOKENS_PER_WORD)).unwrap_or(u32::MAX);

    let continuation = match generator
        .generate_text(&prompt, max_tokens, EXPANSION_TEMPERATURE)
        .await
    {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("Continuation came back empty; keeping unexpanded document");
            return unexpanded(document);
        }
        Err(e) => {
            warn!("Continuation request failed ({e}); keeping unexpanded document");
            return unexpanded(document);
        }
    };

    let content = if document.is_empty() {
        continuation.trim().to_string()
    } else {
        format!("{document}\n\n{}", continuation.trim())
    };
    let final_words = content_word_count(&content);

    Reconciliation {
        content,
        current_words,
        final_words,
        expanded: true,
        expansion_words: final_words.saturating_sub(current_words),
    }
}

/// `round(100 * final / target, 1)`; 0.0 when there is no target.
pub fn accuracy_percent(final_words: usize, target_words: usize) -> f64 {
    if target_words == 0 {
        return 0.0;
    }
    let ratio = 100.0 * final_words as f64 / target_words as f64;
    (ratio * 10.0).round() / 10.0
}

fn build_expansion_prompt(document: &str, style_sample: &str, shortfall: usize) -> String {
    let shortfall = shortfall.to_string();
    fill_template(
        EXPANSION_PROMPT_TEMPLATE,
        &[
            ("shortfall", shortfall.as_str()),
            ("style_sample", tail_chars(style_sample.trim(), STYLE_SAMPLE_CHARS)),
            ("document_tail", tail_chars(document, DOCUMENT_TAIL_CHARS)),
            ("register_instruction", SIMPLE_REGISTER_INSTRUCTION),
            ("output_instruction", PLAIN_OUTPUT_INSTRUCTION),
        ],
    )
}

/// The last `n` characters of `text`, split on a char boundary.
fn tail_chars(text: &str, n: usize) -> &str {
    let total = text.chars().count();
    if total <= n {
        return text;
    }
    text.char_indices()
        .nth(total - n)
        .map(|(start, _)| &text[start..])
        .unwrap_or(text)
}
