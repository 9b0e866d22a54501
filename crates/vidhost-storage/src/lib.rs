//! Vidhost Storage Library
//!
//! This crate provides read access to the object storage where upload content is
//! buffered before being sent to a video host. It includes the [`StorageBuffer`]
//! trait and implementations for S3-compatible stores and the local filesystem.
//!
//! Keys are relative paths. They must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{StorageBuffer, StorageError, StorageResult};
pub use vidhost_core::StorageBackend;
