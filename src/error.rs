use crate::api::ApiResponse;
use crate::services::{
    AuthServiceError, FeedbackError, GenerationError, TokenError, UserServiceError,
};
use crate::validation::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Boundary error for every HTTP endpoint.
///
/// Service errors are converted into this type in the handlers; its
/// `IntoResponse` implementation is the only place status codes and
/// client-facing messages are decided.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Access token required")]
    Unauthenticated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token - user not found")]
    UnknownSubject,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    /// The completion API failed; the message is what the client sees.
    #[error("{0}")]
    Upstream(String),

    /// Unexpected failure. The detail is logged and replaced by `public_message`.
    #[error("Internal error: {detail}")]
    Internal {
        public_message: &'static str,
        detail: String,
    },
}

impl AppError {
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        AppError::Internal {
            public_message: "Internal server error",
            detail: detail.to_string(),
        }
    }

    pub fn internal_with(public_message: &'static str, detail: impl std::fmt::Display) -> Self {
        AppError::Internal {
            public_message,
            detail: detail.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated
            | AppError::InvalidToken
            | AppError::ExpiredToken
            | AppError::UnknownSubject
            | AppError::InvalidCredentials
            | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::internal(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::ExpiredToken,
            TokenError::Invalid => AppError::InvalidToken,
            TokenError::Encoding(detail) => AppError::internal(detail),
            other @ TokenError::LifetimeOutOfRange => AppError::internal(other),
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(details) => AppError::Validation(details),
            UserServiceError::EmailTaken => {
                AppError::Conflict(UserServiceError::EmailTaken.to_string())
            }
            UserServiceError::UserNotFound => AppError::NotFound("User not found".to_string()),
            other => AppError::internal(other),
        }
    }
}

impl From<AuthServiceError> for AppError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::InvalidCredentials => AppError::InvalidCredentials,
            AuthServiceError::UserNotFound => AppError::UnknownSubject,
            other => AppError::internal(other),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        tracing::error!("Generation failed: {}", err);
        AppError::Upstream("Failed to generate push notifications".to_string())
    }
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::InvalidRating => AppError::Validation(vec![FieldError::new(
                "rating",
                "Rating must be between 1 and 5",
            )]),
            FeedbackError::NotFound => AppError::NotFound("Notification not found".to_string()),
            other => AppError::internal_with("Failed to process feedback", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(details) => {
                ApiResponse::<()>::error("Validation Error").with_details(details)
            }
            AppError::Upstream(message) => ApiResponse::error(&message),
            AppError::Internal {
                public_message,
                detail,
            } => {
                tracing::error!("{}: {}", public_message, detail);
                ApiResponse::error(public_message)
            }
            other => ApiResponse::error(&other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
