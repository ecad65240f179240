use serde::Serialize;
use sqlx::FromRow;

/// Raw `analytics` row; word and emoji lists are JSON arrays in text columns.
#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsRow {
    pub id: String,
    pub user_id: String,
    pub top_performing_words: String,
    pub top_performing_emojis: String,
    pub best_performing_tone: Option<String>,
    pub best_performing_length: Option<i64>,
    pub best_performing_urgency: Option<String>,
    pub avg_ctr: f64,
    pub created_at: String,
}

/// Per-user performance snapshot, recomputed outside this service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub id: String,
    pub user_id: String,
    pub top_performing_words: Vec<String>,
    pub top_performing_emojis: Vec<String>,
    pub best_performing_tone: Option<String>,
    pub best_performing_length: Option<i64>,
    pub best_performing_urgency: Option<String>,
    pub avg_ctr: f64,
    pub created_at: String,
}

impl From<AnalyticsRow> for Analytics {
    fn from(row: AnalyticsRow) -> Self {
        Self {
            top_performing_words: serde_json::from_str(&row.top_performing_words)
                .unwrap_or_default(),
            top_performing_emojis: serde_json::from_str(&row.top_performing_emojis)
                .unwrap_or_default(),
            id: row.id,
            user_id: row.user_id,
            best_performing_tone: row.best_performing_tone,
            best_performing_length: row.best_performing_length,
            best_performing_urgency: row.best_performing_urgency,
            avg_ctr: row.avg_ctr,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_lists_degrade_to_empty() {
        let row = AnalyticsRow {
            id: "a".into(),
            user_id: "u".into(),
            top_performing_words: r#"["flash","sale"]"#.into(),
            top_performing_emojis: "not json".into(),
            best_performing_tone: None,
            best_performing_length: Some(40),
            best_performing_urgency: None,
            avg_ctr: 3.2,
            created_at: "2025-01-01T00:00:00.000Z".into(),
        };
        let analytics = Analytics::from(row);
        assert_eq!(analytics.top_performing_words, vec!["flash", "sale"]);
        assert!(analytics.top_performing_emojis.is_empty());
    }
}
