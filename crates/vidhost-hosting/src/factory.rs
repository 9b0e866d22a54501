use std::sync::Arc;
#[cfg(not(feature = "host-youtube"))]
use vidhost_core::AppError;
use vidhost_core::{AppResult, Config, HostBackend};

use crate::traits::VideoHost;
#[cfg(feature = "host-youtube")]
use crate::youtube::YoutubeHost;

/// Create the video host selected by configuration
pub fn create_video_host(config: &Config) -> AppResult<Arc<dyn VideoHost>> {
    match config.video_host {
        #[cfg(feature = "host-youtube")]
        HostBackend::Youtube => {
            let host = YoutubeHost::from_config(&config.youtube)?;
            tracing::info!(host = %config.video_host, "Video host initialized");
            Ok(Arc::new(host))
        }

        #[cfg(not(feature = "host-youtube"))]
        HostBackend::Youtube => Err(AppError::Config(
            "YouTube host not available (host-youtube feature not enabled)".to_string(),
        )),
    }
}
