use guestbook_api::{app, config::AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, GUESTBOOK_ADMIN_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Guestbook API in {:?} mode with {:?} store",
        config.environment,
        config.store.backend
    );
    if config.security.admin_secret.is_empty() {
        tracing::warn!("GUESTBOOK_ADMIN_SECRET is not set; admin endpoints will reject every request");
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::from_config(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Guestbook API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
