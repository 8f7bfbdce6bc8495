//! # Format Catalog
//!
//! The four export formats and what each one can carry.
//!
//! ```text
//! ┌────────┬───────────┬────────────────┬─────────────────────┐
//! │ Format │ Extension │ supports_charts│ supports_statistics │
//! ├────────┼───────────┼────────────────┼─────────────────────┤
//! │ CSV    │ .csv      │       no       │         no          │
//! │ JSON   │ .json     │       no       │         yes         │
//! │ Excel  │ .xlsx     │       yes      │         yes         │
//! │ PDF    │ .pdf      │       yes      │         yes         │
//! └────────┴───────────┴────────────────┴─────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use ts_rs::TS;

// =============================================================================
// Export Format
// =============================================================================

/// One of the supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
    Pdf,
}

impl ExportFormat {
    /// All formats, in catalog order.
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Json,
        ExportFormat::Excel,
        ExportFormat::Pdf,
    ];

    /// Display name used in the catalog and in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
            ExportFormat::Excel => "Excel",
            ExportFormat::Pdf => "PDF",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => ".csv",
            ExportFormat::Json => ".json",
            ExportFormat::Excel => ".xlsx",
            ExportFormat::Pdf => ".pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    fn filename_prefix(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "medicine_report",
            _ => "medicine_export",
        }
    }

    /// Download filename stamped with `at`, e.g. `medicine_export_20250314_092653.csv`.
    pub fn filename(self, at: NaiveDateTime) -> String {
        format!(
            "{}_{}{}",
            self.filename_prefix(),
            at.format("%Y%m%d_%H%M%S"),
            self.extension()
        )
    }

    /// Catalog entry for this format.
    pub fn descriptor(self) -> FormatDescriptor {
        let (description, supports_charts, supports_statistics) = match self {
            ExportFormat::Csv => (
                "Comma-separated values for spreadsheets; adds an ingredients column \
                 unless include_details=false",
                false,
                false,
            ),
            ExportFormat::Json => (
                "Structured data for APIs; records carry an ingredients list \
                 unless include_details=false",
                false,
                true,
            ),
            ExportFormat::Excel => (
                "Microsoft Excel with multiple sheets; adds an ingredients column \
                 unless include_details=false",
                true,
                true,
            ),
            ExportFormat::Pdf => (
                "Report format with tables; the detail table is drawn when \
                 include_details=false",
                true,
                true,
            ),
        };

        FormatDescriptor {
            name: self.name(),
            extension: self.extension(),
            description,
            supports_charts,
            supports_statistics,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Static description of one export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FormatDescriptor {
    pub name: &'static str,
    pub extension: &'static str,
    pub description: &'static str,
    pub supports_charts: bool,
    pub supports_statistics: bool,
}

/// Lists every export format in fixed order: CSV, JSON, Excel, PDF.
pub fn list_formats() -> Vec<FormatDescriptor> {
    ExportFormat::ALL.iter().map(|f| f.descriptor()).collect()
}
