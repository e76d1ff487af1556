//! Axum route handlers for the Humanize API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::humanize::sections::content_word_count;
use crate::humanize::store::{get_run, is_humanized_output, save_run};
use crate::humanize::{humanize, HumanizationResult};
use crate::models::humanization::HumanizationRunRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HumanizeRequest {
    pub content: String,
    /// Defaults to the body word count of `content`.
    pub target_words: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HumanizeResponse {
    pub run_id: Uuid,
    pub result: HumanizationResult,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub run_id: Uuid,
    pub content: String,
    pub word_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/humanize
///
/// Runs the full pipeline: sectionize → rewrite chunks → reassemble → reconcile length.
/// The original document is stored with the run so it can be restored later.
/// Content that is exactly the output of an earlier run is refused with 409.
pub async fn handle_humanize(
    State(state): State<AppState>,
    Json(request): Json<HumanizeRequest>,
) -> Result<Json<HumanizeResponse>, AppError> {
    validate_request(&request)?;
    if is_humanized_output(&state.db, &request.content).await? {
        return Err(AppError::Conflict(
            "content has already been humanized; restore the original first".to_string(),
        ));
    }

    let result = humanize(
        &request.content,
        request.target_words,
        state.rewriter.clone(),
        state.generator.as_ref(),
        &state.humanize,
    )
    .await;

    let run_id = save_run(&state.db, &request.content, &result).await?;

    Ok(Json(HumanizeResponse { run_id, result }))
}

/// GET /api/v1/humanize/runs/:id
pub async fn handle_get_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<HumanizationRunRow>, AppError> {
    Ok(Json(get_run(&state.db, run_id).await?))
}

/// POST /api/v1/humanize/runs/:id/restore
///
/// Returns the document as it was before humanization.
pub async fn handle_restore(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<RestoreResponse>, AppError> {
    let run = get_run(&state.db, run_id).await?;
    Ok(Json(restore_response(run)))
}

fn restore_response(run: HumanizationRunRow) -> RestoreResponse {
    RestoreResponse {
        run_id: run.id,
        word_count: content_word_count(&run.original_content),
        content: run.original_content,
    }
}

fn validate_request(request: &HumanizeRequest) -> Result<(), AppError> {
    if request.content.trim().is_empty() {
        return Err(AppError::Validation("content cannot be empty".to_string()));
    }
    if request.target_words == Some(0) {
        return Err(AppError::Validation(
            "target_words must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
