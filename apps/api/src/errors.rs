use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::enhancement::EnhancementError;
use crate::persistence::StoreError;
use crate::render::ExportError;
use crate::wizard::Refusal;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Refused: {0}")]
    Refused(Refusal),

    #[error("{0} already in progress")]
    Busy(&'static str),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Enhancement error: {0}")]
    Enhancement(#[from] EnhancementError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<Refusal> for AppError {
    fn from(refusal: Refusal) -> Self {
        match refusal {
            Refusal::UnknownEntry { .. } => AppError::NotFound(refusal.to_string()),
            Refusal::DocumentChanged => AppError::Conflict(refusal.to_string()),
            other => AppError::Refused(other),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(e).context("document store"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Refused(refusal) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "REFUSED",
                refusal.to_string(),
            ),
            AppError::Busy(action) => (
                StatusCode::CONFLICT,
                "BUSY",
                format!("{action} already in progress"),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Enhancement(e) => {
                tracing::error!("Enhancement error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ENHANCEMENT_FAILED",
                    e.to_string(),
                )
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    "The document could not be exported".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
