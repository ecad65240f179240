use crate::{api::ApiResponse, auth::AuthUser, error::Result, models::UserProfile, AppState};
use axum::extract::State;

pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<ApiResponse<UserProfile>> {
    let profile = state.user_service.get_profile(&user.id).await?;
    Ok(ApiResponse::ok(profile))
}
