pub mod auth_service;
pub mod completion_client;
pub mod feedback_recorder;
pub mod notification_generator;
pub mod prompt;
pub mod reply_parser;
pub mod token_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use completion_client::{CompletionClient, CompletionError, OpenAiClient};
pub use feedback_recorder::{FeedbackError, FeedbackRecorder};
pub use notification_generator::{GenerationError, NotificationGenerator};
pub use token_service::{TokenClaims, TokenError, TokenService};
pub use user_service::{CreateUserRequest, UserService, UserServiceError};
