//! Serve command - runs the HTTP prediction service.

use anyhow::{Context, Result};
use config::Config;
use database::run_migrations;
use scorer::ScorerState;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::http::{AppState, router};

/// Runs the serve command.
///
/// Migrations run and the model bundle is loaded before the listener binds.
/// A model that fails to load leaves the service up with prediction routes
/// answering 503.
///
/// # Errors
///
/// Returns an error if migrations fail, the address cannot be bound, or the
/// server stops abnormally.
pub async fn run(pool: SqlitePool, config: &Config) -> Result<()> {
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let scorer = ScorerState::load(&config.model_path);
    if !scorer.is_ready() {
        warn!("Scorer is not ready; prediction endpoints will answer 503");
    }

    if config.api_key.is_none() {
        warn!("API_KEY is not set; prediction endpoints are not protected");
    }

    let state = AppState::new(pool, scorer, config.api_key.clone());
    let app = router(state, config.request_timeout);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!(
        addr = %config.bind_addr,
        timeout_secs = config.request_timeout.as_secs(),
        "Attrition prediction service listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            error!(error = %err, "Failed to listen for shutdown signal");
            core::future::pending::<()>().await;
        }
    }
}
