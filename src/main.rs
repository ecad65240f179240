use pushgen::{
    config::AppConfig,
    db,
    router::build_router,
    services::{CompletionClient, OpenAiClient, TokenService},
    AppState,
};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pushgen=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    // Database connection
    let pool = db::create_pool().await?;
    db::run_migrations(&pool).await?;

    let token_service = TokenService::new(&config.jwt.secret, config.jwt.expires_in)?;
    let completion: Arc<dyn CompletionClient> = Arc::new(OpenAiClient::new(&config.openai)?);

    let app_state = AppState::new(pool, token_service, completion, config.openai.model.clone());
    let app = build_router(
        app_state,
        config.cors_origin.as_deref(),
        config.is_production(),
    );

    let addr = SocketAddr::from((config.host, config.port));
    tracing::info!(environment = %config.environment, "Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
