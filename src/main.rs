use std::sync::Arc;

use anyhow::Context;
use fashion_ai_backend::{
    config::AppConfig, routes, services::http_gateway::HttpGateway, state::AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let gateway = HttpGateway::new(config.gateway.clone()).context("failed to build HTTP client")?;

    let state = Arc::new(AppState::new(Arc::new(gateway), config.models.clone()));

    let app = routes::router(&config.static_dir, config.max_body_bytes).with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!("Fashion AI backend running at http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
