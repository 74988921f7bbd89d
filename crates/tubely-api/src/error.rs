//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; any `AppError`
//! converts with `?` and renders with a consistent status, body and log line.

use axum::{
    extract::{multipart::MultipartError, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ErrorMetadata, LogLevel};

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse.
/// `IntoResponse` and `AppError` are both foreign to this crate.
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(format!("Failed to read multipart body: {}", err.body_text()))
        };
        HttpAppError(app)
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

/// Detail-free body attached to every error response, swapped in by
/// [`hide_error_details`] when running in production.
#[derive(Debug, Clone)]
struct RedactedError(ErrorResponse);

impl HttpAppError {
    fn body(&self, hide_details: bool) -> ErrorResponse {
        let app_error = &self.0;
        ErrorResponse {
            error: app_error.client_message(),
            details: (!hide_details).then(|| app_error.detailed_message()),
            error_type: (!hide_details).then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        // Sensitive errors never carry details.
        let mut response = (status, Json(self.body(self.0.is_sensitive()))).into_response();
        response
            .extensions_mut()
            .insert(RedactedError(self.body(true)));
        response
    }
}

/// Router-level response mapper: in production every error body loses its
/// details, regardless of which handler produced it.
pub async fn hide_error_details(State(production): State<bool>, response: Response) -> Response {
    if !production {
        return response;
    }

    match response.extensions().get::<RedactedError>().cloned() {
        Some(RedactedError(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}
