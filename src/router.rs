use crate::{
    api::ApiResponse,
    auth::{self, handlers as auth_handlers},
    handlers::{ai_handlers, stub_handlers, user_handlers},
    AppState,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full HTTP surface. `cors_origin` restricts CORS to a single
/// origin; `None` allows any. `hsts` adds Strict-Transport-Security to every
/// response.
pub fn build_router(state: AppState, cors_origin: Option<&str>, hsts: bool) -> Router {
    let protected_routes = Router::new()
        .route("/ai/generate", post(ai_handlers::generate))
        .route("/ai/feedback", post(ai_handlers::feedback))
        .route("/ai/insights", get(ai_handlers::insights))
        .route("/user/profile", get(user_handlers::profile))
        .route("/analytics", get(stub_handlers::analytics))
        .route("/campaign", get(stub_handlers::campaigns))
        .route("/notification", get(stub_handlers::notifications))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let optional_auth_routes = Router::new()
        .route("/auth/logout", post(auth_handlers::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth_handlers::register))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/refresh", post(auth_handlers::refresh))
        .merge(optional_auth_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(hsts, add_security_headers))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> ApiResponse<Value> {
    ApiResponse::ok(json!({ "status": "ok" }))
}

fn cors_layer(cors_origin: Option<&str>) -> CorsLayer {
    let origin = match cors_origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid CORS_ORIGIN ({}); allowing any origin", e);
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}

async fn add_security_headers(
    State(hsts): State<bool>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}
