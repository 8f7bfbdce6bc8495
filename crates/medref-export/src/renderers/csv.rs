//! CSV renderer.
//!
//! The header comes from the first record's column keys, and every later
//! record is written in that key order. A record carrying a column the first
//! one lacked (an ingredient list) loses it.

use std::borrow::Cow;

use chrono::{Local, NaiveDateTime};
use tracing::debug;

use medref_core::{FilterSet, MedicineRecord};

use crate::catalog::ExportFormat;
use crate::document::{ExportDocument, ExportInput, FormatRenderer};
use crate::error::RenderResult;

/// Renders `rows` as CSV, stamping the filename with the current time.
///
/// An empty row set yields an empty body, without even a header.
pub fn render_csv(rows: &[MedicineRecord], filters: &FilterSet) -> RenderResult<ExportDocument> {
    debug!(rows = rows.len(), filters = %filters, "Rendering CSV");
    csv_document(rows, Local::now().naive_local())
}

fn csv_document(rows: &[MedicineRecord], at: NaiveDateTime) -> RenderResult<ExportDocument> {
    Ok(ExportDocument {
        format: ExportFormat::Csv,
        bytes: encode(rows)?,
        filename: ExportFormat::Csv.filename(at),
    })
}

fn encode(rows: &[MedicineRecord]) -> RenderResult<Vec<u8>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let keys = first.column_keys();

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&keys)?;
    for record in rows {
        let values: Vec<Cow<'_, str>> = keys
            .iter()
            .map(|key| record.column_value(key).unwrap_or_default())
            .collect();
        writer.write_record(values.iter().map(|v| v.as_bytes()))?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

/// [`FormatRenderer`] for CSV; the filename uses the statistics timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl FormatRenderer for CsvRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, input: &ExportInput<'_>) -> RenderResult<ExportDocument> {
        debug!(rows = input.rows.len(), filters = %input.filters, "Rendering CSV");
        csv_document(input.rows, input.statistics.export_timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medref_core::{Ingredient, BASE_COLUMNS};

    fn read_back(bytes: &[u8]) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = ::csv::Reader::from_reader(bytes);
        let header = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        (header, rows)
    }

    #[test]
    fn test_empty_rows_produce_empty_body() {
        let doc = render_csv(&[], &FilterSet::new()).unwrap();
        assert!(doc.bytes.is_empty());
        assert_eq!(doc.mime_type(), "text/csv");
        assert!(doc.filename.starts_with("medicine_export_"));
        assert!(doc.filename.ends_with(".csv"));
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let rows = vec![
            MedicineRecord::new("Aspirin, 500mg")
                .category("Analgesic")
                .manufacturer("Bayer"),
            MedicineRecord::new("Say \"ahh\" syrup").classification("OTC"),
        ];

        let doc = render_csv(&rows, &FilterSet::new()).unwrap();
        let (header, records) = read_back(&doc.bytes);

        assert_eq!(header, BASE_COLUMNS.to_vec());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0][0], "Aspirin, 500mg");
        assert_eq!(records[0][1], "Analgesic");
        assert_eq!(records[0][2], "Bayer");
        assert_eq!(records[1][0], "Say \"ahh\" syrup");
        // null → empty cell
        assert_eq!(records[1][1], "");
        assert_eq!(records[1][6], "OTC");
    }

    #[test]
    fn test_header_follows_first_record() {
        let with_ingredients = MedicineRecord::new("Co-codamol").ingredients(vec![Ingredient {
            name: "Codeine".to_string(),
            strength: Some("8 mg".to_string()),
        }]);
        let plain = MedicineRecord::new("Aspirin");

        let doc = render_csv(&[with_ingredients.clone(), plain.clone()], &FilterSet::new()).unwrap();
        let (header, records) = read_back(&doc.bytes);
        assert_eq!(header.last().map(String::as_str), Some("ingredients"));
        assert_eq!(records[0][7], "Codeine (8 mg)");
        assert_eq!(records[1][7], "");

        // First record decides: the later ingredient list is dropped
        let doc = render_csv(&[plain, with_ingredients], &FilterSet::new()).unwrap();
        let (header, records) = read_back(&doc.bytes);
        assert_eq!(header.len(), BASE_COLUMNS.len());
        assert_eq!(records[1].len(), BASE_COLUMNS.len());
    }

    #[test]
    fn test_renderer_uses_crlf() {
        let rows = vec![MedicineRecord::new("Aspirin")];
        let doc = render_csv(&rows, &FilterSet::new()).unwrap();
        let text = String::from_utf8(doc.bytes).unwrap();
        assert!(text.starts_with("medicine_name,category,"));
        assert!(text.ends_with("\r\n"));
    }
}
