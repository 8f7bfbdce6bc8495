//! # Render Contract
//!
//! Every format consumes the same input triple and produces one fully
//! materialized document.
//!
//! ```text
//!   ExportInput { rows, filters, statistics }
//!        │
//!        ▼
//!   dyn FormatRenderer ── CsvRenderer | JsonRenderer | SpreadsheetRenderer | PdfRenderer
//!        │
//!        ▼
//!   ExportDocument { bytes, mime_type, filename }
//! ```

use medref_core::{FilterSet, MedicineRecord, Statistics};

use crate::catalog::ExportFormat;
use crate::error::RenderResult;

/// Borrowed view of everything a renderer may read.
#[derive(Debug, Clone, Copy)]
pub struct ExportInput<'a> {
    pub rows: &'a [MedicineRecord],
    pub filters: &'a FilterSet,
    pub statistics: &'a Statistics,
}

/// A rendered export, ready to hand to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl ExportDocument {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `Content-Disposition` header value for downloads.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename)
    }
}

/// A stateless document encoder.
///
/// Implementations hold only per-request options, never data between calls,
/// so one value can be moved onto a blocking thread and dropped afterwards.
pub trait FormatRenderer: Send {
    fn format(&self) -> ExportFormat;

    fn render(&self, input: &ExportInput<'_>) -> RenderResult<ExportDocument>;
}
