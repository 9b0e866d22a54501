//! Vidhost Infrastructure Library
//!
//! This crate provides shared infrastructure components used by the vidhost services:
//! - Progress publishing (HTTP pub/sub sidecar)
//! - Telemetry initialization
//! - Middleware (request ID)
//! - HTTP error response body

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;
pub mod progress;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{request_id_middleware, RequestId};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

pub use error::ErrorResponse;

pub use progress::{create_progress_publisher, ProgressPublisher, PublishError};

#[cfg(feature = "progress-http")]
pub use progress::{HttpPubSubConfig, HttpPubSubPublisher};
