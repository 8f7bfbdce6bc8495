//! # Error Types
//!
//! The only failure the pure domain layer reports is bad client input.
//! Everything else (storage, encoding) belongs to the crates that do I/O.
//!
//! ## Where Errors Live
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  medref-core    ValidationError  filter/search/limit/id rejected       │
//! │  medref-db      DbError          SQLite or migration failure           │
//! │  medref-export  RenderError      encoder failure                       │
//! │  apps/api       ApiError         what the HTTP client sees             │
//! │                                                                         │
//! │  ValidationError ──► 400       DbError / RenderError ──► 404 or 500    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Input validation errors.
///
/// Raised before any query runs, so a rejected request never touches the
/// database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Search text or a filter value is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}
