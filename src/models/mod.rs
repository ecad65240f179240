pub mod analytics;
pub mod generation;
pub mod learning_data;
pub mod notification;
pub mod preferences;
pub mod user;

pub use analytics::{Analytics, AnalyticsRow};
pub use generation::{
    FeedbackRequest, GenerateRequest, GeneratedNotification, GeneratedNotifications,
};
pub use learning_data::AiLearningData;
pub use notification::{NewNotification, Notification};
pub use preferences::UserPreferences;
pub use user::{PublicUser, User, UserProfile};
