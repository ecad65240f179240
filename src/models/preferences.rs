use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub id: String,
    pub user_id: String,
    pub preferred_tone: Option<String>,
    pub preferred_length: Option<String>,
    pub preferred_urgency: Option<String>,
    pub preferred_emojis: bool,
    pub auto_learn_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}
