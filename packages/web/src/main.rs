use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use api::Settings;

use crate::app::AppState;
use crate::views::JsonRenderer;

mod app;
mod context;
mod error;
mod flash;
mod handlers;
mod views;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("failed to load configuration")?;

    let pool = api::db::connect(&settings.database).context("invalid database configuration")?;

    app::prepare_store(&pool).await;

    let state = AppState::new(pool, Arc::new(JsonRenderer));
    let router = app::router(state, &settings.session);

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
