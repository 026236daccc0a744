// Entry point for the image resolver server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use og_image_resolver::store::SqliteStore;
use og_image_resolver::{create_app, AppState, Config, HttpFetcher, ImageResolver};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,og_image_resolver=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(database = %config.database_url, "configuration loaded");

    let store = SqliteStore::connect(&config.database_url)
        .await
        .context("Failed to open item database")?;
    let fetcher = HttpFetcher::with_config(config.fetch_config())
        .context("Failed to build HTTP client")?;

    let resolver = ImageResolver::new(Arc::new(fetcher), Arc::new(store));
    let app = create_app(AppState::new(resolver));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
