use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use validator::Validate;
use vidhost_core::{AppError, AppResult, Config, ItemMetadata, UploadInfos, Video};
use vidhost_hosting::{create_video_host, ProgressFn, VideoHost};
use vidhost_infra::ProgressPublisher;
use vidhost_storage::StorageBuffer;

use crate::job::UploadJob;
use crate::sampler::{ProgressSample, ProgressSampler};

/// Options of the upload orchestration
#[derive(Debug, Clone)]
pub struct VideoStoreServiceOptions {
    /// Retries after the first failed storage read; the read runs at most
    /// `storage_max_retries + 1` times
    pub storage_max_retries: u32,
    /// How often buffered progress samples are published
    pub progress_interval: Duration,
}

impl Default for VideoStoreServiceOptions {
    fn default() -> Self {
        Self {
            storage_max_retries: 10,
            progress_interval: Duration::from_secs(1),
        }
    }
}

/// Uploads content buffered in object storage to the configured video host
#[derive(Clone)]
pub struct VideoStoreService {
    storage: Arc<dyn StorageBuffer>,
    publisher: Option<Arc<dyn ProgressPublisher>>,
    host: Arc<dyn VideoHost>,
    options: VideoStoreServiceOptions,
}

impl VideoStoreService {
    pub fn new(
        storage: Arc<dyn StorageBuffer>,
        publisher: Option<Arc<dyn ProgressPublisher>>,
        host: Arc<dyn VideoHost>,
        options: VideoStoreServiceOptions,
    ) -> Self {
        Self {
            storage,
            publisher,
            host,
            options,
        }
    }

    /// Build the service for the video host selected in `config`
    pub fn from_config(
        config: &Config,
        storage: Arc<dyn StorageBuffer>,
        publisher: Option<Arc<dyn ProgressPublisher>>,
    ) -> AppResult<Self> {
        let host = create_video_host(config)?;
        let options = VideoStoreServiceOptions {
            storage_max_retries: config.storage.max_retries,
            progress_interval: config.progress.interval,
        };

        Ok(Self::new(storage, publisher, host, options))
    }

    /// The video host, for operations that need no orchestration
    pub fn host(&self) -> Arc<dyn VideoHost> {
        self.host.clone()
    }

    /// Upload the content stored under `storage_key` as a new video.
    ///
    /// When a progress publisher is configured, `IN_PROGRESS` events are
    /// published for `job_id` while the transfer runs, followed by exactly one
    /// `DONE` or `ERROR` event. That terminal event has been published by the
    /// time this returns, including when the upload never reached the host.
    #[tracing::instrument(skip(self, metadata))]
    pub async fn upload_video_from_storage(
        &self,
        job_id: &str,
        storage_key: &str,
        metadata: Option<&ItemMetadata>,
    ) -> AppResult<Video> {
        let (job, content) = match self.prepare_upload(job_id, storage_key, metadata).await {
            Ok(prepared) => prepared,
            Err(e) => {
                self.publish_failure(job_id, &e).await;
                return Err(e);
            }
        };

        tracing::info!(
            job_id = %job.job_id,
            size_bytes = content.len(),
            "Uploading video to host"
        );

        let result = match &self.publisher {
            Some(publisher) => {
                self.create_with_progress(&job, content, publisher.clone())
                    .await
            }
            None => self.host.create_video(&job.metadata, content, None).await,
        };

        match result {
            Ok(video) => {
                tracing::info!(
                    job_id = %job.job_id,
                    video_id = %video.id,
                    duration_seconds = video.duration_seconds,
                    elapsed_ms = job.elapsed().num_milliseconds(),
                    "Video uploaded"
                );
                Ok(video)
            }
            Err(e) => {
                tracing::error!(job_id = %job.job_id, error = %e, "Video upload failed");
                Err(AppError::Upload(Box::new(e)))
            }
        }
    }

    /// Validate the metadata and buffer the content to upload
    async fn prepare_upload(
        &self,
        job_id: &str,
        storage_key: &str,
        metadata: Option<&ItemMetadata>,
    ) -> AppResult<(UploadJob, Bytes)> {
        let metadata =
            metadata.ok_or_else(|| AppError::validation("video metadata must be provided"))?;
        metadata.validate()?;

        let job = UploadJob::new(job_id, storage_key, metadata.clone());
        let content = self.buffer_with_retry(&job.storage_key).await?;
        Ok((job, content))
    }

    /// Terminal `ERROR` event for an upload that failed before the transfer started
    async fn publish_failure(&self, job_id: &str, error: &AppError) {
        let Some(publisher) = &self.publisher else {
            return;
        };

        if let Err(e) = publisher
            .publish(&UploadInfos::error(job_id, error.to_string()))
            .await
        {
            tracing::error!(job_id = %job_id, error = %e, "Failed to publish upload failure");
        }
    }

    /// Replace the thumbnail of `video_id` with the image stored under `thumbnail_key`
    #[tracing::instrument(skip(self))]
    pub async fn set_video_thumbnail_from_storage(
        &self,
        video_id: &str,
        thumbnail_key: &str,
    ) -> AppResult<()> {
        let content = self.storage.buffer(thumbnail_key).await.map_err(|e| {
            tracing::error!(storage_key = %thumbnail_key, error = %e, "Failed to read thumbnail from storage");
            AppError::Storage(Box::new(e))
        })?;

        self.host.set_thumbnail(video_id, content).await
    }

    /// Read `storage_key`, retrying with a `2^attempt` seconds backoff.
    ///
    /// Content may not be readable yet right after it was written.
    async fn buffer_with_retry(&self, storage_key: &str) -> AppResult<Bytes> {
        let max_retries = self.options.storage_max_retries;
        let mut attempt: u32 = 0;

        loop {
            match self.storage.buffer(storage_key).await {
                Ok(content) => {
                    tracing::debug!(
                        storage_key = %storage_key,
                        attempts = attempt + 1,
                        size_bytes = content.len(),
                        "Content downloaded from storage"
                    );
                    return Ok(content);
                }
                Err(e) => {
                    tracing::warn!(
                        storage_key = %storage_key,
                        attempt,
                        max_retries,
                        transient = e.is_transient(),
                        error = %e,
                        "Failed to download content from storage"
                    );

                    if attempt >= max_retries {
                        return Err(AppError::StorageUnavailable {
                            attempts: attempt + 1,
                            source: Box::new(e),
                        });
                    }

                    tokio::time::sleep(backoff(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn create_with_progress(
        &self,
        job: &UploadJob,
        content: Bytes,
        publisher: Arc<dyn ProgressPublisher>,
    ) -> AppResult<Video> {
        let (sample_tx, sample_rx) = watch::channel::<Option<ProgressSample>>(None);
        let sample_tx = Arc::new(sample_tx);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let sampler = ProgressSampler::new(
            job.job_id.clone(),
            publisher,
            self.options.progress_interval,
        );
        tokio::spawn(sampler.run(sample_rx, outcome_rx));

        let callback_tx = sample_tx.clone();
        let on_progress: ProgressFn = Arc::new(move |current, total| {
            // Overwrites any sample the sampler has not picked up yet
            callback_tx.send_replace(Some(ProgressSample { current, total }));
        });

        let result = self
            .host
            .create_video(&job.metadata, content, Some(on_progress))
            .await;

        let outcome = match &result {
            Ok(video) => Ok(video.clone()),
            Err(e) => Err(e.to_string()),
        };
        if outcome_tx.send(outcome).is_err() {
            tracing::warn!(job_id = %job.job_id, "Progress sampler exited before the upload result");
        }

        // The sampler drops its receiver once the terminal event is out
        sample_tx.closed().await;

        result
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64.checked_shl(attempt).unwrap_or(u64::MAX))
}
