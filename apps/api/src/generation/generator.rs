//! Content Generation — builds prompts, calls the LLM, and normalizes the markdown.
//!
//! Flow: template + brief → prompt → LLM → post_process → GeneratedContent.
//! The output feeds the humanize pipeline, which relies on clean `#` headings.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    GENERATION_PROMPT_TEMPLATE, GENERATION_TEMPERATURE, REFINE_PROMPT_TEMPLATE,
    REFINE_TEMPERATURE, SUGGESTIONS_PROMPT_TEMPLATE, SUGGESTIONS_TEMPERATURE,
};
use crate::generation::templates::ContentType;
use crate::humanize::word_count;
use crate::llm_client::prompts::{fill_template, PLAIN_OUTPUT_INSTRUCTION};
use crate::llm_client::TextGenerator;

const MAX_GENERATION_TOKENS: usize = 4000;
const SUGGESTIONS_MAX_TOKENS: u32 = 800;
const SUGGESTIONS_SNIPPET_CHARS: usize = 2000;
const MAX_SUGGESTIONS: usize = 5;
/// Only the most recent user turns are replayed into the prompt.
const CHAT_CONTEXT_TURNS: usize = 3;

const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "Consider adding more specific examples",
    "Include relevant statistics",
    "Strengthen the call-to-action",
];

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

/// Request body for content generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub title: String,
    pub content_type: ContentType,
    pub audience: String,
    pub word_count: usize,
    #[serde(default)]
    pub brief: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    pub title: String,
    pub content_type: ContentType,
    pub content: String,
    pub word_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Operations
// ────────────────────────────────────────────────────────────────────────────

pub async fn generate_content(
    llm: &dyn TextGenerator,
    request: &GenerateRequest,
) -> Result<GeneratedContent, AppError> {
    let prompt = build_generation_prompt(request);
    let max_tokens = request.word_count.saturating_mul(2).min(MAX_GENERATION_TOKENS) as u32;

    info!(
        "Generating {} '{}' (~{} words)",
        request.content_type.label(),
        request.title,
        request.word_count
    );

    let raw = llm
        .generate_text(&prompt, max_tokens, GENERATION_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Content generation failed: {e}")))?;

    let content = post_process(&raw, Some(&request.title));
    let words = word_count(&content);
    info!("Generated {} words for '{}'", words, request.title);

    Ok(GeneratedContent {
        title: request.title.clone(),
        content_type: request.content_type,
        content,
        word_count: words,
    })
}

/// Revises `content` according to a free-form instruction.
pub async fn refine_content(
    llm: &dyn TextGenerator,
    content: &str,
    instruction: &str,
    keyword: Option<&str>,
) -> Result<String, AppError> {
    let keyword_line = keyword
        .filter(|k| !k.trim().is_empty())
        .map(|k| format!("PRIMARY KEYWORD TO MAINTAIN: {k}"))
        .unwrap_or_default();

    let prompt = fill_template(
        REFINE_PROMPT_TEMPLATE,
        &[
            ("keyword_line", keyword_line.as_str()),
            ("instruction", instruction),
            ("output_instruction", PLAIN_OUTPUT_INSTRUCTION),
            ("content", content),
        ],
    );
    let max_tokens = (word_count(content).max(1) * 2) as u32;

    let refined = llm
        .generate_text(&prompt, max_tokens, REFINE_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Content refinement failed: {e}")))?;

    Ok(post_process(&refined, None))
}

/// Asks for up to five improvement suggestions covering SEO, readability,
/// structure, calls to action and audience fit.
pub async fn suggest_improvements(
    llm: &dyn TextGenerator,
    content: &str,
) -> Result<Vec<String>, AppError> {
    let snippet: String = content.chars().take(SUGGESTIONS_SNIPPET_CHARS).collect();
    let snippet = if content.chars().count() > SUGGESTIONS_SNIPPET_CHARS {
        format!("{snippet}...")
    } else {
        snippet
    };

    let prompt = fill_template(SUGGESTIONS_PROMPT_TEMPLATE, &[("snippet", snippet.as_str())]);
    let text = llm
        .generate_text(&prompt, SUGGESTIONS_MAX_TOKENS, SUGGESTIONS_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Suggestion request failed: {e}")))?;

    Ok(parse_suggestions(&text))
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building and post-processing
// ────────────────────────────────────────────────────────────────────────────

fn build_generation_prompt(request: &GenerateRequest) -> String {
    let recent_user_turns: Vec<String> = request
        .chat_history
        .iter()
        .rev()
        .take(CHAT_CONTEXT_TURNS)
        .rev()
        .filter(|turn| turn.role == "user")
        .map(|turn| format!("User: {}", turn.content))
        .collect();
    let chat_context = if recent_user_turns.is_empty() {
        String::new()
    } else {
        format!("\nPrevious Instructions:\n{}\n", recent_user_turns.join("\n"))
    };

    let structure = fill_template(
        request.content_type.structure(),
        &[("title", request.title.as_str())],
    );
    let word_count = request.word_count.to_string();
    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("structure", structure.as_str()),
            ("content_type", request.content_type.label()),
            ("audience", request.audience.as_str()),
            ("word_count", word_count.as_str()),
            ("keyword", request.keyword.as_str()),
            ("chat_context", chat_context.as_str()),
            ("output_instruction", PLAIN_OUTPUT_INSTRUCTION),
            ("brief", request.brief.as_str()),
            ("title", request.title.as_str()),
        ],
    )
}

/// Normalizes LLM markdown:
/// - ensures an H1 title when `title` is given and the text has no leading heading
/// - resolves placeholder markers
/// - promotes ALL-CAPS lines to `##` headings
/// - puts a blank line before and after every heading, collapsing repeated blanks
pub fn post_process(content: &str, title: Option<&str>) -> String {
    let mut content = content.trim().to_string();
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        if !content.starts_with('#') {
            content = format!("# {}\n\n{content}", title.trim());
        }
    }

    let content = content
        .replace("[stat needed]", "(industry research shows)")
        .replace("[source]", "");

    let mut lines: Vec<String> = Vec::new();
    for line in content.lines() {
        let line = if !line.trim().is_empty() && !line.starts_with('#') && is_all_caps(line) {
            format!("## {}", title_case(line.trim()))
        } else {
            line.to_string()
        };

        if line.starts_with('#') {
            if lines.last().is_some_and(|prev| !prev.trim().is_empty()) {
                lines.push(String::new());
            }
            lines.push(line);
            lines.push(String::new());
        } else if line.trim().is_empty() && lines.last().is_some_and(|prev| prev.trim().is_empty()) {
            continue;
        } else {
            lines.push(line);
        }
    }

    lines.join("\n").trim().to_string()
}

fn is_all_caps(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// Capitalizes the first letter of every alphabetic run, lowercasing the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn parse_suggestions(text: &str) -> Vec<String> {
    let suggestions: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(['•', '-', '*', '1', '2', '3', '4', '5']))
        .map(|line| {
            line.trim_start_matches(|c: char| "•-*123456789. ".contains(c))
                .to_string()
        })
        .filter(|s| !s.is_empty())
        .take(MAX_SUGGESTIONS)
        .collect();

    if suggestions.is_empty() {
        FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect()
    } else {
        suggestions
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
