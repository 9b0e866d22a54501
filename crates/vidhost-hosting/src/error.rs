//! Provider error classification
//!
//! Adapters report failures as [`ProviderError`]; the conversion into
//! [`AppError`] is the single place deciding what callers see:
//!
//! - an HTTP error status becomes a `RequestError` with that status,
//! - a "not found" condition reported without a status becomes a 404,
//! - anything else (network, decoding, credentials) is left unclassified.

use thiserror::Error;
use vidhost_core::{AppError, RequestError};

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The call succeeded but the requested resource was not in the result
    #[error("{0}")]
    Missing(String),

    /// The OAuth token endpoint refused the stored credentials
    #[error("provider authentication failed: {0}")]
    Auth(String),

    #[error("request to provider failed: {0}")]
    Transport(String),

    #[error("unexpected provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn missing(what: impl Into<String>) -> Self {
        ProviderError::Missing(what.into())
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Status { status, message } => {
                AppError::Request(RequestError::new(status, message))
            }
            ProviderError::Missing(message) => AppError::Request(RequestError::not_found(message)),
            other => {
                let message = other.to_string();
                if message.to_lowercase().contains("not found") {
                    AppError::Request(RequestError::not_found(message))
                } else {
                    AppError::Unclassified(anyhow::Error::new(other))
                }
            }
        }
    }
}
