//! Vidhost Services Layer
//!
//! This crate hosts the upload orchestration: it reads buffered content from
//! object storage with bounded retry, hands it to the configured video host and
//! relays upload progress to the progress publisher while the transfer runs.
//! The API crate depends on it as its single service facade.

mod job;
mod sampler;
mod service;

pub use job::UploadJob;
pub use sampler::CANCELLED_MESSAGE;
pub use service::{VideoStoreService, VideoStoreServiceOptions};

pub use vidhost_hosting::{create_video_host, VideoHost};
pub use vidhost_infra::{create_progress_publisher, ProgressPublisher};
pub use vidhost_storage::{create_storage, StorageBuffer, StorageError};
