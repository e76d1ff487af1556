use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HumanizationRunRow {
    pub id: Uuid,
    pub original_content: String,
    pub humanized_content: String,
    pub original_words: i32,
    pub target_words: i32,
    pub final_words: i32,
    pub accuracy_percent: f64,
    pub expanded: bool,
    pub chunk_stats: Value,
    pub created_at: DateTime<Utc>,
}
