//! # Spreadsheet Renderer
//!
//! Two-sheet XLSX workbook.
//!
//! ```text
//! Sheet "Medicine Data"                Sheet "Statistics"
//! ┌──────────────┬──────────┬─────┐    ┌───────────────────────┬───────────┐
//! │medicine_name │ category │ ... │    │ Export Information    │           │
//! ├──────────────┼──────────┼─────┤    │ Total Medicines       │ 3         │
//! │ Advil        │          │     │    │ Export Timestamp      │ 2025-...  │
//! │ Aspirin      │ Analgesic│     │    │ Filters Applied       │ None      │
//! └──────────────┴──────────┴─────┘    │                       │           │
//!   header: bold, white on #4472C4,    │ Category Distribution │ Count     │
//!   thin border; every column 18 wide  │ Analgesic             │ 2         │
//!                                      │ ...                   │           │
//!                                      │                       │           │
//!                                      │ Top Manufacturers     │ Count     │
//!                                      │ ...                   │           │
//!                                      └───────────────────────┴───────────┘
//! ```
//!
//! Column widths are fixed rather than fitted to content.

use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};
use tracing::debug;

use medref_core::{FilterSet, MedicineRecord, Statistics};

use crate::catalog::ExportFormat;
use crate::document::{ExportDocument, ExportInput, FormatRenderer};
use crate::error::RenderResult;

const DATA_SHEET: &str = "Medicine Data";
const STATS_SHEET: &str = "Statistics";
const DATA_COLUMN_WIDTH: f64 = 18.0;
const HEADER_BACKGROUND: u32 = 0x4472C4;

/// One cell of the statistics sheet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StatCell {
    Text(String),
    Count(u64),
    Blank,
}

/// Renders the workbook.
pub fn render_spreadsheet(
    rows: &[MedicineRecord],
    filters: &FilterSet,
    statistics: &Statistics,
) -> RenderResult<ExportDocument> {
    debug!(rows = rows.len(), filters = %filters, "Rendering spreadsheet");

    let mut workbook = build_workbook(rows, statistics)?;

    Ok(ExportDocument {
        format: ExportFormat::Excel,
        bytes: workbook.save_to_buffer()?,
        filename: ExportFormat::Excel.filename(statistics.export_timestamp),
    })
}

/// Lays out both sheets without serializing the package.
pub fn build_workbook(rows: &[MedicineRecord], statistics: &Statistics) -> RenderResult<Workbook> {
    let mut workbook = Workbook::new();

    let data = workbook.add_worksheet();
    data.set_name(DATA_SHEET)?;
    write_data_sheet(data, rows)?;

    let stats = workbook.add_worksheet();
    stats.set_name(STATS_SHEET)?;
    write_statistics_sheet(stats, statistics)?;

    Ok(workbook)
}

/// Header row plus one row per record. An empty row set leaves the sheet
/// blank, header included.
fn write_data_sheet(sheet: &mut Worksheet, rows: &[MedicineRecord]) -> RenderResult<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let keys = first.column_keys();

    let header = Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_BACKGROUND))
        .set_border(FormatBorder::Thin);

    for (col, key) in keys.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *key, &header)?;
        sheet.set_column_width(col, DATA_COLUMN_WIDTH)?;
    }

    for (row, record) in rows.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, key) in keys.iter().enumerate() {
            if let Some(value) = record.column_value(key) {
                sheet.write_string(row, col as u16, value)?;
            }
        }
    }

    Ok(())
}

fn write_statistics_sheet(sheet: &mut Worksheet, statistics: &Statistics) -> RenderResult<()> {
    sheet.set_column_width(0, 28)?;
    sheet.set_column_width(1, 24)?;

    for (row, cells) in statistics_rows(statistics).iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let (row, col) = (row as u32, col as u16);
            match cell {
                StatCell::Text(text) => {
                    sheet.write_string(row, col, text.as_str())?;
                }
                StatCell::Count(n) => {
                    sheet.write_number(row, col, *n as f64)?;
                }
                StatCell::Blank => {}
            }
        }
    }

    Ok(())
}

/// Label/value layout of the statistics sheet.
pub(crate) fn statistics_rows(statistics: &Statistics) -> Vec<[StatCell; 2]> {
    use StatCell::{Blank, Count, Text};

    let text = |s: &str| Text(s.to_string());

    let mut rows = vec![
        [text("Export Information"), Blank],
        [text("Total Medicines"), Count(statistics.total_medicines)],
        [
            text("Export Timestamp"),
            Text(statistics.export_timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        ],
        [text("Filters Applied"), Text(statistics.filters_applied.describe())],
        [Blank, Blank],
        [text("Category Distribution"), text("Count")],
    ];

    rows.extend(
        statistics
            .category_distribution
            .iter()
            .map(|(name, count)| [text(name), Count(count)]),
    );

    rows.push([Blank, Blank]);
    rows.push([text("Top Manufacturers"), text("Count")]);
    rows.extend(
        statistics
            .top_5_manufacturers
            .iter()
            .map(|(name, count)| [text(name), Count(*count)]),
    );

    rows
}

/// [`FormatRenderer`] for XLSX workbooks.
///
/// `include_charts` is accepted for parity with the catalog's capability
/// flag; the workbook carries no chart objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetRenderer {
    pub include_charts: bool,
}

impl FormatRenderer for SpreadsheetRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Excel
    }

    fn render(&self, input: &ExportInput<'_>) -> RenderResult<ExportDocument> {
        render_spreadsheet(input.rows, input.filters, input.statistics)
    }
}
