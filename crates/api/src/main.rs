use anyhow::Context;

use simplerest_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    simplerest_observability::init();

    let config = ApiConfig::from_env()?;
    if config.public_base_url.is_none() {
        tracing::warn!("SIMPLEREST_BASE_URL not set; Location headers use the request Host");
    }

    let app = simplerest_api::app::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server terminated")?;
    Ok(())
}
