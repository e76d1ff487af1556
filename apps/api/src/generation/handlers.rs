//! Axum route handlers for the Content API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{
    generate_content, refine_content, suggest_improvements, GenerateRequest, GeneratedContent,
};
use crate::humanize::word_count;
use crate::state::AppState;

const MAX_WORD_COUNT: usize = 10_000;

#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    pub content: String,
    pub instruction: String,
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub content: String,
    pub word_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}

/// POST /api/v1/content/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GeneratedContent>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if request.word_count == 0 || request.word_count > MAX_WORD_COUNT {
        return Err(AppError::Validation(format!(
            "word_count must be between 1 and {MAX_WORD_COUNT}"
        )));
    }

    let generated = generate_content(state.generator.as_ref(), &request).await?;
    Ok(Json(generated))
}

/// POST /api/v1/content/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if request.instruction.trim().is_empty() {
        return Err(AppError::Validation("instruction cannot be empty".to_string()));
    }

    let content = refine_content(
        state.generator.as_ref(),
        &request.content,
        &request.instruction,
        request.keyword.as_deref(),
    )
    .await?;

    Ok(Json(RefineResponse {
        word_count: word_count(&content),
        content,
    }))
}

/// POST /api/v1/content/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }

    let suggestions = suggest_improvements(state.generator.as_ref(), &request.content).await?;
    Ok(Json(SuggestionsResponse { suggestions }))
}
