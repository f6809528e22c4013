use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use veritas_core::error::CoreError;
use veritas_db::StoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`] to
/// produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `veritas_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A key-value store error from `veritas_db`.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Required body fields were absent.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Exhausted write retries are a domain conflict; every other store failure
/// stays a store error.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { key } => AppError::Core(CoreError::Conflict(format!(
                "Concurrent updates to {key}, please retry"
            ))),
            other => AppError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::MissingFields(fields) => {
                let body = json!({
                    "error": format!("Missing required fields: {}", fields.join(", ")),
                    "code": "MISSING_FIELDS",
                    "missing": fields,
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - `Unavailable` maps to 503 so clients can tell an outage from "no data".
/// - Everything else maps to 500 with a sanitized message.
///
/// `Conflict` never gets here; the `From` conversion turns it into
/// [`CoreError::Conflict`].
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "Store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "Version store is temporarily unavailable".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
