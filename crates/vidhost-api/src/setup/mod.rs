//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidhost_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::error::configure_error_details(config);

    tracing::info!(
        environment = %config.environment,
        storage_backend = %config.storage.backend,
        video_host = %config.video_host,
        progress = config.progress.is_active(),
        "Configuration loaded and validated successfully"
    );

    let state = services::initialize_services(config).await?;
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
