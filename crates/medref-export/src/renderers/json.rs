//! JSON renderer.
//!
//! ```text
//! {
//!   "export_info": { "timestamp", "total_records", "filters_applied" },
//!   "data": [ MedicineRecord, ... ],
//!   "statistics": { ... }            ← only when requested
//! }
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use medref_core::{FilterSet, MedicineRecord, Statistics};

use crate::catalog::ExportFormat;
use crate::document::{ExportDocument, ExportInput, FormatRenderer};
use crate::error::RenderResult;

#[derive(Serialize)]
struct Envelope<'a> {
    export_info: ExportInfo<'a>,
    data: &'a [MedicineRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a Statistics>,
}

#[derive(Serialize)]
struct ExportInfo<'a> {
    timestamp: NaiveDateTime,
    total_records: usize,
    filters_applied: &'a FilterSet,
}

/// Renders the JSON envelope, pretty-printed with two-space indentation.
pub fn render_json(
    rows: &[MedicineRecord],
    filters: &FilterSet,
    statistics: &Statistics,
    include_statistics: bool,
) -> RenderResult<ExportDocument> {
    debug!(rows = rows.len(), include_statistics, "Rendering JSON");

    let envelope = Envelope {
        export_info: ExportInfo {
            timestamp: statistics.export_timestamp,
            total_records: rows.len(),
            filters_applied: filters,
        },
        data: rows,
        statistics: include_statistics.then_some(statistics),
    };

    Ok(ExportDocument {
        format: ExportFormat::Json,
        bytes: serde_json::to_vec_pretty(&envelope)?,
        filename: ExportFormat::Json.filename(statistics.export_timestamp),
    })
}

/// [`FormatRenderer`] for JSON.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    pub include_statistics: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        JsonRenderer {
            include_statistics: true,
        }
    }
}

impl FormatRenderer for JsonRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, input: &ExportInput<'_>) -> RenderResult<ExportDocument> {
        render_json(
            input.rows,
            input.filters,
            input.statistics,
            self.include_statistics,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use medref_core::aggregate_at;
    use serde_json::Value;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    fn rows() -> Vec<MedicineRecord> {
        vec![
            MedicineRecord::new("Aspirin")
                .category("Analgesic")
                .manufacturer("Bayer"),
            MedicineRecord::new("Advil").manufacturer("Pfizer"),
        ]
    }

    #[test]
    fn test_envelope_with_statistics() {
        let rows = rows();
        let filters = FilterSet::new().with("manufacturer", "a");
        let stats = aggregate_at(&rows, &filters, at());

        let doc = render_json(&rows, &filters, &stats, true).unwrap();
        assert_eq!(doc.filename, "medicine_export_20250314_092653.json");
        assert_eq!(doc.mime_type(), "application/json");

        let value: Value = serde_json::from_slice(&doc.bytes).unwrap();
        assert_eq!(value["export_info"]["timestamp"], "2025-03-14T09:26:53");
        assert_eq!(value["export_info"]["total_records"], 2);
        assert_eq!(value["export_info"]["filters_applied"]["manufacturer"], "a");
        assert_eq!(value["statistics"]["total_medicines"], 2);
        assert_eq!(value["statistics"]["category_distribution"]["Unknown"], 1);
    }

    #[test]
    fn test_data_round_trips() {
        let rows = rows();
        let stats = aggregate_at(&rows, &FilterSet::new(), at());
        let doc = render_json(&rows, &FilterSet::new(), &stats, false).unwrap();

        let value: Value = serde_json::from_slice(&doc.bytes).unwrap();
        assert!(value.get("statistics").is_none());

        let data: Vec<MedicineRecord> = serde_json::from_value(value["data"].clone()).unwrap();
        assert_eq!(data, rows);
    }

    #[test]
    fn test_pretty_printed_with_two_spaces() {
        let stats = aggregate_at(&[], &FilterSet::new(), at());
        let doc = render_json(&[], &FilterSet::new(), &stats, false).unwrap();
        let text = String::from_utf8(doc.bytes).unwrap();

        assert!(text.starts_with("{\n  \"export_info\": {\n    \"timestamp\""));
        assert!(text.contains("\"data\": []"));
    }
}
