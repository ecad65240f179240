use super::user_repository::{RepositoryError, RepositoryResult};
use crate::db::{new_id, now_timestamp};
use crate::models::{NewNotification, Notification};
use async_trait::async_trait;
use sqlx::SqlitePool;

const NOTIFICATION_COLUMNS: &str = r#"
    id, user_id, campaign_id, title, description, product, brand, category, offer,
    discounted_price, mrp, emotion, urgency, tone, ctr, revenue, sent, clicks,
    conversions, rating, created_at, updated_at
"#;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> RepositoryResult<Notification>;
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Notification>>;
    /// The user's notifications with a recorded CTR, best first.
    async fn top_by_ctr(&self, user_id: &str, limit: i64) -> RepositoryResult<Vec<Notification>>;
    /// Overwrites the rating, and the CTR when one is given.
    /// Fails with `NotFound` if no notification has this id.
    async fn record_feedback(
        &self,
        id: &str,
        rating: i64,
        actual_ctr: Option<f64>,
    ) -> RepositoryResult<()>;
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: NewNotification) -> RepositoryResult<Notification> {
        let id = new_id();
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, user_id, campaign_id, title, description, product, brand, category,
                offer, discounted_price, mrp, emotion, urgency, tone, ctr,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&notification.user_id)
        .bind(&notification.campaign_id)
        .bind(&notification.title)
        .bind(&notification.description)
        .bind(&notification.product)
        .bind(&notification.brand)
        .bind(&notification.category)
        .bind(&notification.offer)
        .bind(notification.discounted_price)
        .bind(notification.mrp)
        .bind(&notification.emotion)
        .bind(&notification.urgency)
        .bind(&notification.tone)
        .bind(notification.ctr)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Notification>> {
        let query = format!("SELECT {} FROM notifications WHERE id = ?", NOTIFICATION_COLUMNS);
        let notification = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(notification)
    }

    async fn top_by_ctr(&self, user_id: &str, limit: i64) -> RepositoryResult<Vec<Notification>> {
        let query = format!(
            "SELECT {} FROM notifications WHERE user_id = ? AND ctr > 0 \
             ORDER BY ctr DESC, created_at DESC LIMIT ?",
            NOTIFICATION_COLUMNS
        );
        let notifications = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(notifications)
    }

    async fn record_feedback(
        &self,
        id: &str,
        rating: i64,
        actual_ctr: Option<f64>,
    ) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET rating = ?, ctr = COALESCE(?, ctr), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(rating)
        .bind(actual_ctr)
        .bind(now_timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
