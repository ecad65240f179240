use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pushgen::{
    models::User,
    router::build_router,
    services::TokenService,
    test_utils::test_helpers::{self, StaticCompletionClient, TEST_JWT_SECRET},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::{sync::Arc, time::Duration};
use tower::ServiceExt; // for `oneshot`

const THREE_VARIANTS: &str = r#"{
    "generated": [
        {"title": "🥥 30% OFF Coconut Oil", "description": "Cold-pressed goodness, now cheaper.", "estimatedCTR": 4.1, "confidence": 0.82, "reasoning": "Leads with the discount"},
        {"title": "Hurry, ends tonight ⏰", "description": "30% off organic coconut oil.", "estimatedCTR": 3.7, "confidence": 0.76, "reasoning": "Urgency"},
        {"title": "Glow naturally ✨", "description": "Organic care for hair and skin.", "estimatedCTR": 3.2, "confidence": 0.7, "reasoning": "Benefit-led"}
    ],
    "suggestions": ["Send between 7 and 9 pm", "Test emoji vs no emoji"]
}"#;

async fn setup(completion: Arc<StaticCompletionClient>) -> (SqlitePool, Router, String, String) {
    let pool = test_helpers::create_test_db()
        .await
        .expect("Failed to create test database");
    let user_id = test_helpers::insert_test_user(&pool, "gen@example.com", "Password123")
        .await
        .expect("Failed to create test user");

    let token = TokenService::new(TEST_JWT_SECRET, Duration::from_secs(3600))
        .unwrap()
        .issue(&User {
            id: user_id.clone(),
            email: "gen@example.com".to_string(),
            password_hash: String::new(),
            name: None,
            created_at: String::new(),
            updated_at: String::new(),
        })
        .unwrap();

    let state = test_helpers::create_test_state(pool.clone(), completion);
    (pool, build_router(state, None, false), user_id, token)
}

async fn generate(app: &Router, token: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/ai/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn test_generate_returns_variants_for_new_user() {
    let completion = Arc::new(StaticCompletionClient::replying(THREE_VARIANTS));
    let (pool, app, user_id, token) = setup(completion.clone()).await;

    let (status, body) = generate(
        &app,
        &token,
        json!({"product": "Organic Coconut Oil", "offer": "30% OFF"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Push notifications generated successfully");
    let generated = body["data"]["generated"].as_array().unwrap();
    assert!(generated.len() >= 3);
    assert_eq!(generated[0]["estimatedCTR"], 4.1);
    assert_eq!(body["data"]["suggestions"].as_array().unwrap().len(), 2);

    // Every variant is stored and addressable for feedback.
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
        .bind(&user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 3);
    assert!(generated.iter().all(|g| g["id"].as_str().is_some()));

    // No history, so the system prompt carries no personalised sections.
    let requests = completion.requests();
    assert_eq!(requests.len(), 1);
    let system = &requests[0].messages[0].content;
    assert!(!system.contains("TOP PERFORMING NOTIFICATIONS"));
    assert!(!system.contains("HISTORICAL PERFORMANCE"));
    // Default preferences are always present.
    assert!(system.contains("USER PREFERENCES"));
    assert!(requests[0].messages[1].content.contains("Product: Organic Coconut Oil"));
}

#[tokio::test]
async fn test_generate_uses_history_in_prompt() {
    let completion = Arc::new(StaticCompletionClient::replying(THREE_VARIANTS));
    let (pool, app, user_id, token) = setup(completion.clone()).await;

    test_helpers::insert_test_notification(&pool, &user_id, "Flash sale", 6.5)
        .await
        .unwrap();
    test_helpers::insert_test_notification(&pool, &user_id, "Weekend deal", 2.0)
        .await
        .unwrap();
    test_helpers::insert_test_analytics(
        &pool,
        &user_id,
        &["flash", "free"],
        3.4,
        "2025-05-01T00:00:00.000Z",
    )
    .await
    .unwrap();

    let (status, _) = generate(
        &app,
        &token,
        json!({"product": "Oil", "offer": "BOGO", "discountedPrice": 349, "mrp": "499"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requests = completion.requests();
    let system = &requests[0].messages[0].content;
    assert!(system.contains("1. \"Flash sale\" - \"Flash sale description\" (CTR: 6.5%)"));
    assert!(system.contains("2. \"Weekend deal\""));
    assert!(system.contains("- Top performing words: flash, free"));
    assert!(requests[0].messages[1].content.contains("Price: ₹349 (was ₹499)"));
}

#[tokio::test]
async fn test_generate_falls_back_on_prose_reply() {
    let completion = Arc::new(StaticCompletionClient::replying(
        "Here are some great ideas for your coconut oil campaign!",
    ));
    let (pool, app, _user_id, token) = setup(completion).await;

    let (status, body) = generate(
        &app,
        &token,
        json!({"product": "Organic Coconut Oil", "offer": "30% OFF"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let generated = body["data"]["generated"].as_array().unwrap();
    assert_eq!(generated.len(), 1);
    assert_eq!(generated[0]["title"], "Limited Time Offer!");
    assert_eq!(generated[0]["description"], "Don't miss out on this amazing deal");
    assert_eq!(generated[0]["estimatedCTR"], 2.5);
    assert_eq!(generated[0]["confidence"], 0.7);
    assert_eq!(
        body["data"]["suggestions"],
        json!([
            "Try being more specific with your request",
            "Consider testing different emotional triggers"
        ])
    );

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[tokio::test]
async fn test_generate_empty_reply_is_server_error() {
    let completion = Arc::new(StaticCompletionClient::silent());
    let (_pool, app, _user_id, token) = setup(completion).await;

    let (status, body) = generate(
        &app,
        &token,
        json!({"product": "Organic Coconut Oil", "offer": "30% OFF"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate push notifications");
}

#[tokio::test]
async fn test_generate_validation() {
    let completion = Arc::new(StaticCompletionClient::replying(THREE_VARIANTS));
    let (_pool, app, _user_id, token) = setup(completion.clone()).await;

    let (status, body) = generate(&app, &token, json!({"product": "  ", "mrp": "free"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");
    let messages: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["message"].as_str().unwrap())
        .collect();
    assert_eq!(
        messages,
        vec!["Product is required", "Offer is required", "MRP must be a number"]
    );
    assert!(completion.requests().is_empty());
}
