use super::user_repository::RepositoryResult;
use crate::db::{new_id, now_timestamp};
use crate::models::{AiLearningData, Analytics, AnalyticsRow};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Analytics snapshots and per-user learning counters.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait InsightRepository: Send + Sync {
    async fn latest_analytics(&self, user_id: &str) -> RepositoryResult<Option<Analytics>>;
    async fn find_learning_data(&self, user_id: &str) -> RepositoryResult<Option<AiLearningData>>;
    /// Adds one data point and stamps the training date, creating the
    /// record with empty pattern maps on first use.
    async fn upsert_learning_data(&self, user_id: &str) -> RepositoryResult<AiLearningData>;
}

pub struct SqliteInsightRepository {
    pool: SqlitePool,
}

impl SqliteInsightRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightRepository for SqliteInsightRepository {
    async fn latest_analytics(&self, user_id: &str) -> RepositoryResult<Option<Analytics>> {
        let row = sqlx::query_as::<_, AnalyticsRow>(
            r#"
            SELECT
                id,
                user_id,
                top_performing_words,
                top_performing_emojis,
                best_performing_tone,
                best_performing_length,
                best_performing_urgency,
                avg_ctr,
                created_at
            FROM analytics
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Analytics::from))
    }

    async fn find_learning_data(&self, user_id: &str) -> RepositoryResult<Option<AiLearningData>> {
        let data = sqlx::query_as::<_, AiLearningData>(
            r#"
            SELECT
                id,
                user_id,
                successful_patterns,
                failed_patterns,
                word_effectiveness,
                emoji_effectiveness,
                total_data_points,
                last_training_date,
                created_at,
                updated_at
            FROM ai_learning_data
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(data)
    }

    async fn upsert_learning_data(&self, user_id: &str) -> RepositoryResult<AiLearningData> {
        let now = now_timestamp();

        let data = sqlx::query_as::<_, AiLearningData>(
            r#"
            INSERT INTO ai_learning_data (
                id, user_id, successful_patterns, failed_patterns, word_effectiveness,
                emoji_effectiveness, total_data_points, last_training_date, created_at, updated_at
            )
            VALUES (?, ?, '{}', '{}', '{}', '{}', 1, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                total_data_points = total_data_points + 1,
                last_training_date = excluded.last_training_date,
                updated_at = excluded.updated_at
            RETURNING
                id,
                user_id,
                successful_patterns,
                failed_patterns,
                word_effectiveness,
                emoji_effectiveness,
                total_data_points,
                last_training_date,
                created_at,
                updated_at
            "#,
        )
        .bind(new_id())
        .bind(user_id)
        .bind(&now)
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await?;

        Ok(data)
    }
}
