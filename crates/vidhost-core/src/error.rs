//! Error types module
//!
//! All failures that reach the orchestration layer or the HTTP boundary are
//! unified under [`AppError`]. Provider failures that carry an HTTP status are
//! represented by [`RequestError`] so the status can be propagated unchanged.

/// Boxed error used to keep the underlying cause of storage failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the vidhost crates
pub type AppResult<T> = Result<T, AppError>;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_UNAVAILABLE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

/// A provider call failed with a known HTTP status.
///
/// The message is the provider's own error text; `Display` renders it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub status_code: u16,
    pub message: String,
}

impl RequestError {
    pub const NOT_FOUND: u16 = 404;

    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == Self::NOT_FOUND
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Bad input, or an attempt to change a read-only attribute
    #[error("{0}")]
    Validation(String),

    #[error("error while downloading video from object storage after {attempts} attempt(s): {source}")]
    StorageUnavailable {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    #[error("error while reading from object storage: {0}")]
    Storage(#[source] BoxError),

    #[error(transparent)]
    Request(#[from] RequestError),

    /// Transport or deserialization failure without a structured status
    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),

    #[error("error while uploading video: {0}")]
    Upload(#[source] Box<AppError>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation error: {}", err))
    }
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// The provider status carried by this error, looking through `Upload` wrappers
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            AppError::Request(re) => Some(re),
            AppError::Upload(inner) => inner.request_error(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.request_error().is_some_and(RequestError::is_not_found)
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::StorageUnavailable { .. } => "StorageUnavailable",
            AppError::Storage(_) => "Storage",
            AppError::Request(re) if re.is_not_found() => "NotFound",
            AppError::Request(_) => "ProviderRequest",
            AppError::Unclassified(_) => "Unclassified",
            AppError::Upload(inner) => inner.error_type(),
            AppError::Config(_) => "Config",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::StorageUnavailable { .. } => 503,
            AppError::Storage(_) => 502,
            AppError::Request(re) => re.status_code,
            AppError::Unclassified(_) => 500,
            AppError::Upload(inner) => inner.http_status_code(),
            AppError::Config(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Request(re) if re.is_not_found() => "NOT_FOUND",
            AppError::Request(_) => "PROVIDER_REQUEST_ERROR",
            AppError::Unclassified(_) => "INTERNAL_ERROR",
            AppError::Upload(inner) => inner.error_code(),
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            AppError::StorageUnavailable { .. } | AppError::Storage(_) => true,
            AppError::Request(re) => re.status_code == 429 || re.status_code >= 500,
            AppError::Upload(inner) => inner.is_recoverable(),
            _ => false,
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::StorageUnavailable { .. } => {
                "Content is not available in object storage yet".to_string()
            }
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::Request(re) => re.message.clone(),
            AppError::Unclassified(_) => "Internal server error".to_string(),
            AppError::Upload(inner) => inner.client_message(),
            AppError::Config(_) | AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_) => LogLevel::Debug,
            AppError::Request(re) if re.status_code < 500 => LogLevel::Debug,
            AppError::Request(_) | AppError::StorageUnavailable { .. } => LogLevel::Warn,
            AppError::Upload(inner) => inner.log_level(),
            _ => LogLevel::Error,
        }
    }
}
