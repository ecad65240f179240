use crate::{
    api::{ApiResponse, JsonBody},
    auth::AuthUser,
    error::{AppError, Result},
    models::{FeedbackRequest, GenerateRequest, GeneratedNotifications},
    services::feedback_recorder::{MAX_RATING, MIN_RATING},
    validation::{FieldError, FieldErrors},
    AppState,
};
use axum::extract::State;
use serde::Serialize;
use serde_json::{Map, Value};

type JsonObject = Map<String, Value>;

fn parse_generate_request(body: &JsonObject) -> std::result::Result<GenerateRequest, Vec<FieldError>> {
    let mut errors = FieldErrors::new();

    let product = errors.required_string("product", body.get("product"), "Product is required");
    let offer = errors.required_string("offer", body.get("offer"), "Offer is required");
    let discounted_price = errors.optional_number(
        "discountedPrice",
        body.get("discountedPrice"),
        "Discounted price must be a number",
    );
    let mrp = errors.optional_number("mrp", body.get("mrp"), "MRP must be a number");
    let brand = errors.optional_string("brand", body.get("brand"), "Brand must be a string");
    let category =
        errors.optional_string("category", body.get("category"), "Category must be a string");
    let emotion =
        errors.optional_string("emotion", body.get("emotion"), "Emotion must be a string");
    let urgency =
        errors.optional_string("urgency", body.get("urgency"), "Urgency must be a string");
    let tone = errors.optional_string("tone", body.get("tone"), "Tone must be a string");

    errors.finish(())?;

    Ok(GenerateRequest {
        product: product.unwrap_or_default(),
        offer: offer.unwrap_or_default(),
        discounted_price,
        mrp,
        brand,
        category,
        emotion,
        urgency,
        tone,
    })
}

fn parse_feedback_request(body: &JsonObject) -> std::result::Result<FeedbackRequest, Vec<FieldError>> {
    let mut errors = FieldErrors::new();

    let notification_id = errors.required_string(
        "notificationId",
        body.get("notificationId"),
        "Notification ID is required",
    );
    let rating = errors.integer_in_range(
        "rating",
        body.get("rating"),
        MIN_RATING,
        MAX_RATING,
        "Rating must be between 1 and 5",
    );
    let actual_ctr = errors.optional_number("actualCTR", body.get("actualCTR"), "CTR must be a number");

    errors.finish(())?;

    Ok(FeedbackRequest {
        notification_id: notification_id.unwrap_or_default(),
        rating: rating.unwrap_or_default(),
        actual_ctr,
    })
}

pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<JsonObject>,
) -> Result<ApiResponse<GeneratedNotifications>> {
    let request = parse_generate_request(&body).map_err(AppError::Validation)?;

    let result = state
        .notification_generator
        .generate(&request, &user.id)
        .await?;

    Ok(ApiResponse::ok(result).with_message("Push notifications generated successfully"))
}

pub async fn feedback(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(body): JsonBody<JsonObject>,
) -> Result<ApiResponse<()>> {
    let request = parse_feedback_request(&body).map_err(AppError::Validation)?;

    state.feedback_recorder.record(&user.id, request).await?;

    Ok(ApiResponse::message_only(
        "Feedback received and processed successfully",
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsPlaceholder {
    pub message: &'static str,
    pub user_id: String,
}

pub async fn insights(user: AuthUser) -> ApiResponse<InsightsPlaceholder> {
    ApiResponse::ok(InsightsPlaceholder {
        message: "AI insights endpoint - to be implemented",
        user_id: user.id,
    })
}
