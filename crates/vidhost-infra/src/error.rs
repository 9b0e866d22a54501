//! HTTP error response body
//!
//! The `IntoResponse` implementation for `AppError` lives in the binary crate
//! (vidhost-api) because of the orphan rule.

use serde::Serialize;
use vidhost_core::ErrorMetadata;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorResponse {
    /// Build the body for `err`. Details are only attached outside production.
    pub fn from_metadata<E>(err: &E, details: Option<String>, error_type: Option<String>) -> Self
    where
        E: ErrorMetadata,
    {
        Self {
            error: err.client_message(),
            code: err.error_code(),
            recoverable: err.is_recoverable(),
            details,
            error_type,
        }
    }
}
