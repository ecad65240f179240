pub mod insight_repository;
pub mod notification_repository;
pub mod user_repository;

pub use insight_repository::{InsightRepository, SqliteInsightRepository};
pub use notification_repository::{NotificationRepository, SqliteNotificationRepository};
pub use user_repository::{
    RepositoryError, RepositoryResult, SqliteUserRepository, UserRepository,
};
