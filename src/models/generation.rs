use serde::{Deserialize, Serialize};

/// Validated input for a generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateRequest {
    pub product: String,
    pub offer: String,
    pub discounted_price: Option<f64>,
    pub mrp: Option<f64>,
    pub brand: Option<String>,
    pub category: Option<String>,
    pub emotion: Option<String>,
    pub urgency: Option<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedNotification {
    /// Id of the stored notification record, used for feedback.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    #[serde(rename = "estimatedCTR")]
    pub estimated_ctr: f64,
    pub confidence: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedNotifications {
    pub generated: Vec<GeneratedNotification>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRequest {
    pub notification_id: String,
    pub rating: i64,
    pub actual_ctr: Option<f64>,
}
