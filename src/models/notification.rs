use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored notification, either generated here or imported with its
/// real-world performance figures.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub campaign_id: Option<String>,
    pub title: String,
    pub description: String,
    pub product: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub offer: Option<String>,
    pub discounted_price: Option<f64>,
    pub mrp: Option<f64>,
    pub emotion: Option<String>,
    pub urgency: Option<String>,
    pub tone: Option<String>,
    pub ctr: f64,
    pub revenue: f64,
    pub sent: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub rating: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewNotification {
    pub user_id: String,
    pub campaign_id: Option<String>,
    pub title: String,
    pub description: String,
    pub product: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub offer: Option<String>,
    pub discounted_price: Option<f64>,
    pub mrp: Option<f64>,
    pub emotion: Option<String>,
    pub urgency: Option<String>,
    pub tone: Option<String>,
    pub ctr: f64,
}
