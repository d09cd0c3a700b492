//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every error renders as
//! `{ "message": ..., "error": ... }`: `message` is stable and safe to show, `error` is
//! only present for server errors and carries the detailed cause outside production.

use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use vidflow_core::{AppError, ErrorMetadata, LogLevel, NotificationError};
use vidflow_queue::WatcherError;
use vidflow_storage::StorageError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "fileName and fileContent are required")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse (orphan rule: both the trait and
/// `AppError` are foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// Convert JSON body deserialization failures into a 4xx with our ErrorResponse format.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(rejection.body_text()));
        }
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            other => format!("Invalid request body: {}", other.body_text()),
        };
        HttpAppError(AppError::InvalidInput(message))
    }
}

/// Raw body buffering failures: over the body limit is a 413, anything else a 400.
impl From<BytesRejection> for HttpAppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpAppError(AppError::PayloadTooLarge(rejection.body_text()));
        }
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

/// JSON body extractor that returns our ErrorResponse format on deserialization failure.
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
    let detail = error.detailed_message();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %detail, error_type = error_type, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %detail, error_type = error_type, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl HttpAppError {
    /// Body for this error; `production` hides the detailed cause of sensitive errors.
    pub fn body(&self, production: bool) -> ErrorResponse {
        let app_error = &self.0;
        let error = if app_error.http_status_code() < 500 {
            None
        } else if production && app_error.is_sensitive() {
            Some(app_error.error_code().to_string())
        } else {
            Some(app_error.detailed_message())
        };

        ErrorResponse {
            message: app_error.client_message(),
            error,
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        (status, Json(self.body(is_production_env()))).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidKey(msg) => {
                AppError::InvalidInput(format!("Invalid fileName: {}", msg))
            }
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::IoError(err) => AppError::Storage(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<NotificationError> for HttpAppError {
    fn from(err: NotificationError) -> Self {
        HttpAppError(AppError::InvalidInput(format!("Invalid notification: {}", err)))
    }
}

impl From<WatcherError> for HttpAppError {
    fn from(err: WatcherError) -> Self {
        HttpAppError(AppError::Queue(err.to_string()))
    }
}
