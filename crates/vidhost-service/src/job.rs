use chrono::{DateTime, Utc};
use vidhost_core::ItemMetadata;

/// One upload from object storage to the video host, alive for the duration
/// of [`VideoStoreService::upload_video_from_storage`](crate::VideoStoreService::upload_video_from_storage)
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub job_id: String,
    pub storage_key: String,
    pub metadata: ItemMetadata,
    pub created_at: DateTime<Utc>,
}

impl UploadJob {
    pub fn new(
        job_id: impl Into<String>,
        storage_key: impl Into<String>,
        metadata: ItemMetadata,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            storage_key: storage_key.into(),
            metadata,
            created_at: Utc::now(),
        }
    }

    /// Time elapsed since the job was created
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }
}
