//! Upload progress publishing
//!
//! A [`ProgressPublisher`] delivers one [`UploadInfos`] event at a time to
//! whoever follows upload jobs. Delivery is best effort: callers log failures
//! and carry on.

#[cfg(feature = "progress-http")]
mod http;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use vidhost_core::{ProgressConfig, UploadInfos};

#[cfg(feature = "progress-http")]
pub use http::{HttpPubSubConfig, HttpPubSubPublisher};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to serialize progress event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to send progress event: {0}")]
    Transport(String),

    #[error("Pub/sub rejected progress event with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid signing secret: {0}")]
    Signing(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[async_trait]
pub trait ProgressPublisher: Send + Sync {
    async fn publish(&self, infos: &UploadInfos) -> Result<(), PublishError>;
}

/// Build the configured publisher, or `None` when progress relay is disabled
pub fn create_progress_publisher(
    config: &ProgressConfig,
) -> Result<Option<Arc<dyn ProgressPublisher>>, PublishError> {
    if !config.is_active() {
        tracing::info!("Progress publishing disabled");
        return Ok(None);
    }

    #[cfg(feature = "progress-http")]
    {
        let pubsub_name = config
            .pubsub_name
            .clone()
            .ok_or_else(|| PublishError::Config("PUBSUB_NAME not configured".to_string()))?;

        let publisher = HttpPubSubPublisher::new(HttpPubSubConfig {
            base_url: config.pubsub_base_url.clone(),
            pubsub_name,
            topic: config.topic.clone(),
            signing_secret: config.signing_secret.clone(),
            ..HttpPubSubConfig::default()
        })?;

        tracing::info!(
            url = %publisher.publish_url(),
            "Progress publishing enabled"
        );

        Ok(Some(Arc::new(publisher)))
    }

    #[cfg(not(feature = "progress-http"))]
    {
        Err(PublishError::Config(
            "HTTP progress publisher not available (progress-http feature not enabled)"
                .to_string(),
        ))
    }
}
