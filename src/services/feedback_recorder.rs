use crate::models::FeedbackRequest;
use crate::repositories::{InsightRepository, NotificationRepository, RepositoryError};
use std::sync::Arc;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Rating must be between 1 and 5")]
    InvalidRating,
    #[error("Notification not found")]
    NotFound,
    #[error("Repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for FeedbackError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => FeedbackError::NotFound,
            other => FeedbackError::Repository(other),
        }
    }
}

pub struct FeedbackRecorder {
    notifications: Arc<dyn NotificationRepository>,
    insights: Arc<dyn InsightRepository>,
}

impl FeedbackRecorder {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        insights: Arc<dyn InsightRepository>,
    ) -> Self {
        Self {
            notifications,
            insights,
        }
    }

    /// Stores a rating (and optionally a measured CTR) for a notification and
    /// bumps the user's learning-data counter.
    ///
    /// The counter is only touched once the rating has been stored.
    pub async fn record(&self, user_id: &str, feedback: FeedbackRequest) -> Result<(), FeedbackError> {
        if !(MIN_RATING..=MAX_RATING).contains(&feedback.rating) {
            return Err(FeedbackError::InvalidRating);
        }

        // A zero CTR carries no measurement.
        let actual_ctr = feedback.actual_ctr.filter(|ctr| *ctr != 0.0);

        self.notifications
            .record_feedback(&feedback.notification_id, feedback.rating, actual_ctr)
            .await?;

        let learning = self.insights.upsert_learning_data(user_id).await?;

        tracing::info!(
            user_id,
            notification_id = %feedback.notification_id,
            rating = feedback.rating,
            data_points = learning.total_data_points,
            "Feedback recorded"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AiLearningData;
    use crate::repositories::insight_repository::MockInsightRepository;
    use crate::repositories::notification_repository::MockNotificationRepository;
    use mockall::predicate::*;

    fn learning_data(user_id: &str, points: i64) -> AiLearningData {
        AiLearningData {
            id: "ld-1".to_string(),
            user_id: user_id.to_string(),
            successful_patterns: "{}".to_string(),
            failed_patterns: "{}".to_string(),
            word_effectiveness: "{}".to_string(),
            emoji_effectiveness: "{}".to_string(),
            total_data_points: points,
            last_training_date: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn feedback(rating: i64, actual_ctr: Option<f64>) -> FeedbackRequest {
        FeedbackRequest {
            notification_id: "n-1".to_string(),
            rating,
            actual_ctr,
        }
    }

    #[tokio::test]
    async fn test_record_updates_rating_and_learning_data() {
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_record_feedback()
            .with(eq("n-1"), eq(5), eq(Some(4.2)))
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(()) }));

        let mut insights = MockInsightRepository::new();
        insights
            .expect_upsert_learning_data()
            .with(eq("user-1"))
            .times(1)
            .returning(|user_id| {
                let data = learning_data(user_id, 1);
                Box::pin(async move { Ok(data) })
            });

        let recorder = FeedbackRecorder::new(Arc::new(notifications), Arc::new(insights));
        recorder
            .record("user-1", feedback(5, Some(4.2)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_zero_ctr_is_not_stored() {
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_record_feedback()
            .with(eq("n-1"), eq(3), eq(None::<f64>))
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Ok(()) }));

        let mut insights = MockInsightRepository::new();
        insights.expect_upsert_learning_data().returning(|user_id| {
            let data = learning_data(user_id, 2);
            Box::pin(async move { Ok(data) })
        });

        let recorder = FeedbackRecorder::new(Arc::new(notifications), Arc::new(insights));
        recorder.record("user-1", feedback(3, Some(0.0))).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_notification_skips_learning_data() {
        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_record_feedback()
            .times(1)
            .returning(|_, _, _| Box::pin(async move { Err(RepositoryError::NotFound) }));

        let mut insights = MockInsightRepository::new();
        insights.expect_upsert_learning_data().times(0);

        let recorder = FeedbackRecorder::new(Arc::new(notifications), Arc::new(insights));
        let result = recorder.record("user-1", feedback(4, None)).await;
        assert!(matches!(result, Err(FeedbackError::NotFound)));
    }

    #[tokio::test]
    async fn test_rating_out_of_range_touches_nothing() {
        let mut notifications = MockNotificationRepository::new();
        notifications.expect_record_feedback().times(0);
        let mut insights = MockInsightRepository::new();
        insights.expect_upsert_learning_data().times(0);

        let recorder = FeedbackRecorder::new(Arc::new(notifications), Arc::new(insights));
        for rating in [0, 6, -1] {
            let result = recorder.record("user-1", feedback(rating, None)).await;
            assert!(matches!(result, Err(FeedbackError::InvalidRating)));
        }
    }
}
