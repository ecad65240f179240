use super::middleware::AuthUser;
use crate::{
    api::{ApiResponse, JsonBody},
    error::{AppError, Result},
    models::PublicUser,
    services::{CreateUserRequest, LoginRequest},
    validation::{is_valid_email, FieldErrors},
    AppState,
};
use axum::{body::Bytes, extract::State, http::StatusCode, response::Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<RegisterRequest>,
) -> Result<Response> {
    let user = state
        .user_service
        .create_user(CreateUserRequest {
            email: form.email,
            password: form.password,
            name: form.name,
        })
        .await?;

    let token = state.token_service.issue(&user)?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
    .with_message("User registered successfully")
    .into_response_with(StatusCode::CREATED))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<LoginForm>,
) -> Result<Response> {
    let mut errors = FieldErrors::new();
    if !is_valid_email(form.email.trim()) {
        errors.add("email", "Please provide a valid email");
    }
    if form.password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.finish(()).map_err(AppError::Validation)?;

    let user = state
        .auth_service
        .authenticate(LoginRequest {
            email: form.email,
            password: form.password,
        })
        .await?;

    let token = state.token_service.issue(&user)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: PublicUser::from(&user),
    })
    .with_message("Login successful")
    .into_response_with(StatusCode::OK))
}

/// Token refresh is not implemented; the endpoint only checks that a
/// refresh token was sent.
pub async fn refresh(body: Bytes) -> Result<ApiResponse<()>> {
    let request: RefreshRequest = serde_json::from_slice(&body).unwrap_or_default();

    match request.refresh_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => {
            Ok(ApiResponse::message_only("Token refresh not implemented yet"))
        }
        _ => Err(AppError::Unauthorized("Refresh token required".to_string())),
    }
}

/// Tokens are stateless, so there is nothing to revoke.
pub async fn logout(user: Option<AuthUser>) -> ApiResponse<()> {
    if let Some(user) = user {
        tracing::info!(user_id = %user.id, "User logged out");
    }

    ApiResponse::message_only("Logout successful")
}
