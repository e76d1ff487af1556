// Content generation — produces the markdown documents that are later humanized.
// Implements: structure templates, prompt building, post-processing, refinement, suggestions.
// All LLM calls go through llm_client::TextGenerator.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod templates;
