//! Endpoints that exist so clients can be wired up ahead of the features.

use crate::{api::ApiResponse, auth::AuthUser};
use serde_json::Value;

fn placeholder(name: &str) -> ApiResponse<Vec<Value>> {
    ApiResponse::ok(Vec::new()).with_message(&format!("{} endpoint - to be implemented", name))
}

pub async fn analytics(_user: AuthUser) -> ApiResponse<Vec<Value>> {
    placeholder("Analytics")
}

pub async fn campaigns(_user: AuthUser) -> ApiResponse<Vec<Value>> {
    placeholder("Campaign")
}

pub async fn notifications(_user: AuthUser) -> ApiResponse<Vec<Value>> {
    placeholder("Notification")
}
