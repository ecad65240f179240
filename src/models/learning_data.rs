use serde::Serialize;
use sqlx::FromRow;

/// Per-user feedback bookkeeping. The pattern maps are placeholders that
/// stay `{}` until a learning step exists.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiLearningData {
    pub id: String,
    pub user_id: String,
    pub successful_patterns: String,
    pub failed_patterns: String,
    pub word_effectiveness: String,
    pub emoji_effectiveness: String,
    pub total_data_points: i64,
    pub last_training_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
