//! Unit Converter
//!
//! HTTP service for volume and weight conversions.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use unitconv::build_info;
use unitconv::config::{log_level_directive, ServiceConfig};
use unitconv::db;
use unitconv::features::{FeatureHubToggles, FeatureToggle, StaticToggles};
use unitconv::http::{router, AppState};
use unitconv::tools::status::StatusTracker;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG wins; otherwise LOG_LEVEL picks the crate level
    let level = log_level_directive(std::env::var("LOG_LEVEL").ok().as_deref());
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("unitconv={},tower_http={}", level, level))
    })?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    build_info::log_startup_banner();

    let config = ServiceConfig::from_env()?;
    tracing::info!("Database path: {}", config.database_path.display());

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        if db::migrations::needs_migration(conn)? {
            tracing::info!("Applying database migrations");
        }
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        tracing::info!("Database schema version: {}", version);
        Ok(())
    })?;

    let toggles: Arc<dyn FeatureToggle> = match &config.featurehub {
        Some(fh) => Arc::new(FeatureHubToggles::new(&fh.url, &fh.api_key)?),
        None => {
            tracing::warn!("FeatureHub URL or API key is missing from environment variables.");
            Arc::new(StaticToggles::disabled())
        }
    };

    let state = AppState::new(
        database,
        toggles,
        StatusTracker::new(config.database_path.clone()),
        config.history_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
