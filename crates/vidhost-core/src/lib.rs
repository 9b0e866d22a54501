//! Vidhost Core Library
//!
//! This crate provides the domain models, error taxonomy, backend identifiers and
//! configuration shared by every vidhost component.

pub mod backends;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use backends::{HostBackend, StorageBackend};
pub use config::{Config, ProgressConfig, StorageConfig, YoutubeConfig};
pub use error::{AppError, AppResult, BoxError, ErrorMetadata, LogLevel, RequestError};
pub use models::{
    ItemMetadata, Playlist, ProgressEvent, UploadInfos, UploadState, Video, Visibility,
};
