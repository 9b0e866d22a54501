#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{StorageBackend, StorageBuffer, StorageError, StorageResult};
use std::sync::Arc;
use vidhost_core::StorageConfig;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &StorageConfig) -> StorageResult<Arc<dyn StorageBuffer>> {
    match config.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region.clone().ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;

            let storage = S3Storage::new(bucket, region, config.s3_endpoint.clone())?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(&config.local_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage_config(backend: StorageBackend, local_path: String) -> StorageConfig {
        StorageConfig {
            backend,
            local_path,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            max_retries: 10,
        }
    }

    #[tokio::test]
    async fn test_local_backend_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        let config = storage_config(
            StorageBackend::Local,
            dir.path().to_string_lossy().into_owned(),
        );
        let storage = create_storage(&config).await.unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn test_s3_backend_requires_bucket() {
        let config = storage_config(StorageBackend::S3, String::new());
        let err = create_storage(&config).await.err().unwrap();
        assert!(matches!(err, StorageError::ConfigError(ref m) if m.contains("S3_BUCKET")));
    }
}
