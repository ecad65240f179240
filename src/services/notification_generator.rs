use crate::models::{GenerateRequest, GeneratedNotifications, NewNotification};
use crate::repositories::{InsightRepository, NotificationRepository, UserRepository};
use crate::services::completion_client::{
    ChatMessage, CompletionClient, CompletionError, CompletionRequest,
};
use crate::services::prompt::{build_system_prompt, build_user_prompt, GenerationContext};
use crate::services::reply_parser::{fallback_notifications, parse_model_reply};
use std::sync::Arc;

pub const HISTORY_LIMIT: i64 = 10;
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Completion request failed: {0}")]
    Upstream(#[from] CompletionError),
    #[error("No response from completion API")]
    EmptyReply,
}

pub struct NotificationGenerator {
    notifications: Arc<dyn NotificationRepository>,
    insights: Arc<dyn InsightRepository>,
    users: Arc<dyn UserRepository>,
    completion: Arc<dyn CompletionClient>,
    model: String,
}

impl NotificationGenerator {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        insights: Arc<dyn InsightRepository>,
        users: Arc<dyn UserRepository>,
        completion: Arc<dyn CompletionClient>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            notifications,
            insights,
            users,
            completion,
            model: model.into(),
        }
    }

    /// Generates notification variants for `request`.
    ///
    /// Fails only when the completion call errors or returns no text. An
    /// unparseable reply yields the fixed fallback content instead.
    /// Generated variants are stored so they can receive feedback; each
    /// returned variant carries its record id when storing succeeded.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        user_id: &str,
    ) -> Result<GeneratedNotifications, GenerationError> {
        let context = self.load_context(user_id).await;

        let completion_request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(build_system_prompt(&context)),
                ChatMessage::user(build_user_prompt(request)),
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let reply = self
            .completion
            .complete(completion_request)
            .await?
            .ok_or(GenerationError::EmptyReply)?;

        let mut result = match parse_model_reply(&reply) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Unparseable completion reply, using fallback");
                return Ok(fallback_notifications());
            }
        };

        self.store_variants(&mut result, request, user_id).await;

        tracing::info!(
            user_id,
            variants = result.generated.len(),
            "Generated push notifications"
        );
        Ok(result)
    }

    /// History lookups never fail the request; a failed lookup is logged
    /// and treated as missing.
    async fn load_context(&self, user_id: &str) -> GenerationContext {
        let top_notifications = self
            .notifications
            .top_by_ctr(user_id, HISTORY_LIMIT)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id, error = %e, "Failed to load notification history");
                Vec::new()
            });

        let analytics = self
            .insights
            .latest_analytics(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id, error = %e, "Failed to load analytics");
                None
            });

        let preferences = self
            .users
            .find_preferences(user_id)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id, error = %e, "Failed to load preferences");
                None
            });

        GenerationContext {
            top_notifications,
            analytics,
            preferences,
        }
    }

    async fn store_variants(
        &self,
        result: &mut GeneratedNotifications,
        request: &GenerateRequest,
        user_id: &str,
    ) {
        for variant in result.generated.iter_mut() {
            let record = NewNotification {
                user_id: user_id.to_string(),
                campaign_id: None,
                title: variant.title.clone(),
                description: variant.description.clone(),
                product: Some(request.product.clone()),
                brand: request.brand.clone(),
                category: request.category.clone(),
                offer: Some(request.offer.clone()),
                discounted_price: request.discounted_price,
                mrp: request.mrp,
                emotion: request.emotion.clone(),
                urgency: request.urgency.clone(),
                tone: request.tone.clone(),
                ctr: 0.0,
            };

            match self.notifications.create(record).await {
                Ok(stored) => variant.id = Some(stored.id),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "Failed to store generated notification");
                }
            }
        }
    }
}
