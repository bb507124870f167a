use dotenv::dotenv;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use nlp_dashboard::api::{self, AppState};
use nlp_dashboard::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    let bind_addr = settings.bind_addr;
    tracing::info!(analyzer = %settings.analyzer_url, "using analysis backend");

    let app = api::router(Arc::new(AppState::new(settings)));

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
