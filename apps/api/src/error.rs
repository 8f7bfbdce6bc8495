//! # API Error Types
//!
//! What HTTP clients see when a request fails.
//!
//! ## Mapping
//! ```text
//! ┌──────────────────────────────┬────────┬────────────────┬──────────────────────────────┐
//! │ Source                       │ Status │ code           │ message                      │
//! ├──────────────────────────────┼────────┼────────────────┼──────────────────────────────┤
//! │ DbError::NotFound            │ 404    │ NOT_FOUND      │ "Medicine not found: 7"      │
//! │ ValidationError, bad body,   │ 400    │ BAD_REQUEST    │ validator or parser message  │
//! │ malformed query string / ID  │        │                │                              │
//! │ fetch/aggregate/render fails │ 500    │ EXPORT_FAILED  │ "Error exporting to PDF: …"  │
//! │ anything else                │ 500    │ INTERNAL       │ generic (details logged)     │
//! └──────────────────────────────┴────────┴────────────────┴──────────────────────────────┘
//! ```
//!
//! Body shape: `{ "error": { "code": "...", "message": "..." } }`

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use medref_core::ValidationError;
use medref_db::DbError;
use medref_export::ExportFormat;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// An export could not be produced.
    ///
    /// ## When This Occurs
    /// - The row fetch fails mid-export
    /// - An encoder fails (font registration, workbook assembly, ...)
    /// - The blocking render task panics
    #[error("Error exporting to {}: {message}", .format.name())]
    Render {
        format: ExportFormat,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Wraps any failure inside an export pipeline.
    pub fn render(format: ExportFormat, err: impl std::fmt::Display) -> Self {
        ApiError::Render {
            format,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Render { format, message } => {
                error!(format = format.name(), %message, "Export failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_FAILED",
                    self.to_string(),
                )
            }
            ApiError::Internal(detail) => {
                error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// A query string axum could not deserialize (`?limit=ten`,
/// `?include_details=maybe`).
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// A path segment of the wrong type (`/api/medicines/abc`).
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
