//! Run history — keeps the pre-humanization document so callers can restore it.
//! The pipeline itself is stateless; only the HTTP layer writes here.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::humanize::HumanizationResult;
use crate::models::humanization::HumanizationRunRow;

/// Persists one finished run and returns its id.
pub async fn save_run(
    pool: &PgPool,
    original_content: &str,
    result: &HumanizationResult,
) -> Result<Uuid, AppError> {
    let run_id = Uuid::new_v4();
    let chunk_stats = serde_json::to_value(&result.chunk_stats)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize chunk stats: {e}")))?;

    sqlx::query(
        r#"
        INSERT INTO humanization_runs
            (id, original_content, humanized_content, original_words, target_words,
             final_words, accuracy_percent, expanded, chunk_stats)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(run_id)
    .bind(original_content)
    .bind(&result.content)
    .bind(to_db_count(result.original_words))
    .bind(to_db_count(result.target_words))
    .bind(to_db_count(result.final_words))
    .bind(result.accuracy_percent)
    .bind(result.expanded)
    .bind(&chunk_stats)
    .execute(pool)
    .await?;

    info!("Stored humanization run {run_id}");
    Ok(run_id)
}

pub async fn get_run(pool: &PgPool, run_id: Uuid) -> Result<HumanizationRunRow, AppError> {
    let row =
        sqlx::query_as::<_, HumanizationRunRow>("SELECT * FROM humanization_runs WHERE id = $1")
            .bind(run_id)
            .fetch_optional(pool)
            .await?;
    found(run_id, row)
}

/// True when `content` is byte-equal to the output of a stored run.
pub async fn is_humanized_output(pool: &PgPool, content: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM humanization_runs
            WHERE md5(humanized_content) = md5($1) AND humanized_content = $1
        )
        "#,
    )
    .bind(content)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

fn found(run_id: Uuid, row: Option<HumanizationRunRow>) -> Result<HumanizationRunRow, AppError> {
    row.ok_or_else(|| AppError::NotFound(format!("Humanization run {run_id} not found")))
}

fn to_db_count(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_run_is_not_found() {
        let run_id = Uuid::new_v4();
        match found(run_id, None) {
            Err(AppError::NotFound(msg)) => assert!(msg.contains(&run_id.to_string())),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_counts_saturate_at_column_max() {
        assert_eq!(to_db_count(1500), 1500);
        assert_eq!(to_db_count(usize::MAX), i32::MAX);
    }
}
