//! # PDF Report
//!
//! Paginated report: summary statistics, optional chart images, and a
//! truncated detail table.
//!
//! ```text
//!   rows + filters + statistics + PdfOptions
//!        │
//!        ▼
//!   story::build_story ──► Vec<Element>     (what goes in the report)
//!        │
//!        ▼
//!   typeset::Typesetter ──► %PDF bytes      (where it lands on the page)
//! ```

pub mod story;
pub mod typeset;

use serde::Deserialize;
use tracing::debug;

use medref_core::{FilterSet, MedicineRecord, Statistics};

use crate::catalog::ExportFormat;
use crate::document::{ExportDocument, ExportInput, FormatRenderer};
use crate::error::RenderResult;

use self::story::build_story;
use self::typeset::Typesetter;

/// Report title, also used as the PDF document title.
pub const REPORT_TITLE: &str = "Medicine Data Export Report";

/// Per-request PDF switches.
///
/// `include_details` keeps its historical inverted meaning: the detail table
/// is drawn only when it is `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    pub include_details: bool,
    pub include_charts: bool,
    /// Base64 images, optionally as `data:image/...;base64,` URLs.
    pub chart_images: Vec<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        PdfOptions {
            include_details: false,
            include_charts: true,
            chart_images: Vec::new(),
        }
    }
}

/// Renders the PDF report.
pub fn render_pdf(
    rows: &[MedicineRecord],
    filters: &FilterSet,
    statistics: &Statistics,
    options: &PdfOptions,
) -> RenderResult<ExportDocument> {
    let story = build_story(rows, filters, statistics, options);
    debug!(
        rows = rows.len(),
        elements = story.len(),
        charts = options.chart_images.len(),
        "Rendering PDF"
    );

    let mut setter = Typesetter::new(REPORT_TITLE)?;
    for element in &story {
        setter.place(element);
    }
    debug!(pages = setter.page_count(), "PDF laid out");

    Ok(ExportDocument {
        format: ExportFormat::Pdf,
        bytes: setter.finish()?,
        filename: ExportFormat::Pdf.filename(statistics.export_timestamp),
    })
}

/// [`FormatRenderer`] for the PDF report.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    pub options: PdfOptions,
}

impl FormatRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, input: &ExportInput<'_>) -> RenderResult<ExportDocument> {
        render_pdf(input.rows, input.filters, input.statistics, &self.options)
    }
}
