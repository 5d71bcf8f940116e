use anyhow::Context;
use happa::bootstrap;
use happa::config::Config;
use happa::infrastructure::http::router::build_router;
use happa::infrastructure::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    let _telemetry = observability::init(&config)?;
    tracing::info!("Configuration loaded");

    let state = bootstrap::build_app_state(&config)?;
    let app = build_router(state);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
