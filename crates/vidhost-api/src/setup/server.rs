//! HTTP listener and graceful shutdown

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use vidhost_core::Config;

/// Serve `app` until SIGINT or SIGTERM, then drain in-flight requests
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        video_host = %config.video_host,
        storage_backend = %config.storage.backend,
        storage_max_retries = config.storage.max_retries,
        progress = config.progress.is_active(),
        progress_interval_ms = config.progress.interval.as_millis() as u64,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    vidhost_infra::shutdown_telemetry().await;
    Ok(())
}

/// # Panics
/// Panics if a signal handler cannot be installed.
async fn shutdown_signal() {
    tokio::select! {
        _ = interrupt() => tracing::info!(signal = "SIGINT", "Shutting down"),
        _ = terminate() => tracing::info!(signal = "SIGTERM", "Shutting down"),
    }
}

async fn interrupt() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    signal(SignalKind::terminate())
        .expect("Failed to install SIGTERM handler")
        .recv()
        .await;
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}
