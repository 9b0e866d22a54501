//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Any `AppError` converts into it
//! with `?`, and renders with the status from [`ErrorMetadata`]: a provider
//! `RequestError` keeps the status the provider answered with.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use vidhost_core::{AppError, Config, ErrorMetadata, LogLevel};
use vidhost_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(AppError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor rendering deserialization failures as a 400 [`ErrorResponse`]
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

static EXPOSE_DETAILS: OnceLock<bool> = OnceLock::new();

/// Decide once, from the loaded configuration, whether error bodies carry
/// the source chain. Details stay hidden until this is called.
pub fn configure_error_details(config: &Config) {
    if EXPOSE_DETAILS.set(!config.is_production()).is_err() {
        tracing::debug!("Error detail mode already configured");
    }
}

fn error_body(error: &AppError, expose_details: bool) -> ErrorResponse {
    if expose_details {
        ErrorResponse::from_metadata(
            error,
            Some(error.detailed_message()),
            Some(error.error_type().to_string()),
        )
    } else {
        ErrorResponse::from_metadata(error, None, None)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let expose_details = EXPOSE_DETAILS.get().copied().unwrap_or(false);
        (status, Json(error_body(app_error, expose_details))).into_response()
    }
}
