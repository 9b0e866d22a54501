//! Storage, progress publisher and upload service wiring

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vidhost_core::Config;
use vidhost_infra::create_progress_publisher;
use vidhost_service::VideoStoreService;
use vidhost_storage::create_storage;

pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let storage = create_storage(&config.storage)
        .await
        .context("Failed to initialize storage")?;

    let publisher = create_progress_publisher(&config.progress)
        .context("Failed to initialize progress publisher")?;

    let service = VideoStoreService::from_config(config, storage, publisher)
        .context("Failed to initialize video host")?;

    Ok(Arc::new(AppState::new(service)))
}
