//! # Render Error Types
//!
//! Failures while encoding an export document.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  csv::Error / serde_json::Error / XlsxError / printpdf::Error          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RenderError (this module)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError::Render { format, .. } → HTTP 500 "Error exporting to PDF: …" │
//! │                                                                         │
//! │  Exception: a chart image that fails to decode never reaches here.     │
//! │  The PDF renderer swaps in a placeholder note and carries on.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Document encoding errors. Any of these aborts the whole export.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet encoding failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    /// PDF assembly failed.
    ///
    /// ## When This Occurs
    /// - Builtin font registration fails
    /// - The document cannot be serialized to the output buffer
    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    #[error("Output buffer error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<printpdf::Error> for RenderError {
    fn from(err: printpdf::Error) -> Self {
        RenderError::Pdf(err.to_string())
    }
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
