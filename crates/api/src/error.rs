use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use foyer_core::error::CoreError;
use foyer_sync::{StoreError, SyncError};
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Renders every failure as `{ "error": message, "code": CODE }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A failed manager or reconciler operation.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Sync(SyncError::Core(core)) => classify_core_error(core),
            AppError::Sync(SyncError::Store(store)) => classify_store_error(store),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

/// Classify a store failure into an HTTP status, error code, and message.
///
/// - Rejected writes map to 409 with the message the component chose.
/// - An unreachable store maps to 503.
/// - Any other database error maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> Classified {
    match err {
        StoreError::Rejected(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        StoreError::Unavailable(msg) => {
            tracing::warn!(error = %msg, "Store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORE_UNAVAILABLE",
                "The household store is unavailable".to_string(),
            )
        }
        StoreError::Database(db) => {
            tracing::error!(error = %db, "Internal error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
