pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod router;
pub mod services;
pub mod validation;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use repositories::{
    InsightRepository, NotificationRepository, SqliteInsightRepository,
    SqliteNotificationRepository, SqliteUserRepository, UserRepository,
};
use services::{
    AuthService, CompletionClient, FeedbackRecorder, NotificationGenerator, TokenService,
    UserService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub token_service: Arc<TokenService>,
    pub notification_generator: Arc<NotificationGenerator>,
    pub feedback_recorder: Arc<FeedbackRecorder>,
    pub pool: sqlx::SqlitePool,
}

impl AppState {
    /// Wires the SQLite repositories and every service around one pool.
    pub fn new(
        pool: sqlx::SqlitePool,
        token_service: TokenService,
        completion: Arc<dyn CompletionClient>,
        model: impl Into<String>,
    ) -> Self {
        let user_repository: Arc<dyn UserRepository> =
            Arc::new(SqliteUserRepository::new(pool.clone()));
        let notification_repository: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(pool.clone()));
        let insight_repository: Arc<dyn InsightRepository> =
            Arc::new(SqliteInsightRepository::new(pool.clone()));

        AppState {
            user_service: Arc::new(UserService::new(user_repository.clone())),
            auth_service: Arc::new(AuthService::new(user_repository.clone())),
            token_service: Arc::new(token_service),
            notification_generator: Arc::new(NotificationGenerator::new(
                notification_repository.clone(),
                insight_repository.clone(),
                user_repository,
                completion,
                model,
            )),
            feedback_recorder: Arc::new(FeedbackRecorder::new(
                notification_repository,
                insight_repository,
            )),
            pool,
        }
    }
}
