use anyhow::Context;

use bookstore_simulation::{AppConfig, SimulationManager};

const BIND_ENV: &str = "BOOKSTORE_BIND";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bookstore_observability::init();

    let config = AppConfig::load().context("loading configuration")?;
    let manager = SimulationManager::new(config).context("opening simulation")?;
    let app = bookstore_api::app::build_app(manager);

    let addr = std::env::var(BIND_ENV).unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
