//! Storage abstraction trait
//!
//! Upload content is written to object storage by an upstream component. This
//! crate only needs to read it back, so the trait is deliberately read-only.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    /// Whether a later attempt may succeed. Stores materialize writes
    /// asynchronously, so a missing object is not treated as permanent.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            StorageError::InvalidKey(_) | StorageError::ConfigError(_)
        )
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Read side of the object storage holding upload content
///
/// The backing store may report content as absent right after a write has
/// completed, so callers are expected to retry `buffer` on failure.
#[async_trait]
pub trait StorageBuffer: Send + Sync {
    /// Read the whole object stored under `storage_key` into memory
    async fn buffer(&self, storage_key: &str) -> StorageResult<Bytes>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
