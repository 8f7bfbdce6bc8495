//! # Report Story
//!
//! The report as an ordered list of [`Element`]s, before any page geometry.
//!
//! ```text
//! Title ─ Info ─ Heading "Summary Statistics"
//!   ├─ Subheading + Table   Top 5 Categories            (if any)
//!   ├─ Subheading + Table   Top 5 Manufacturers         (if any)
//!   └─ Subheading + Table   Classification Distribution (if any)
//! PageBreak ─ Heading "Charts" ─ Image | Note per chart   (include_charts && images)
//! PageBreak ─ Heading ─ Table (≤ 50 rows) ─ Note?         (!include_details && rows)
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use printpdf::image_crate::{self, DynamicImage};
use tracing::warn;

use medref_core::{FilterSet, MedicineRecord, Statistics};

use super::PdfOptions;

/// Records shown in the detail table before truncating.
pub const DETAIL_ROW_LIMIT: usize = 50;

/// Character budget for the Name column of the detail table.
const NAME_BUDGET: usize = 30;

/// Character budget for every other detail column.
const CELL_BUDGET: usize = 20;

/// Table column widths, in inches.
const SUMMARY_WIDTHS: [f32; 2] = [4.0, 1.5];
const DETAIL_WIDTHS: [f32; 4] = [2.3, 1.4, 1.5, 1.3];

/// One block of report content.
#[derive(Debug, Clone)]
pub enum Element {
    /// Centered report title.
    Title(String),
    /// Bold label followed by a value, one per line.
    Info(Vec<(String, String)>),
    Heading(String),
    Subheading(String),
    Table(Table),
    /// Decoded chart image, drawn at a fixed size.
    Image(DynamicImage),
    /// Italic remark (placeholders, truncation notices).
    Note(String),
    /// Vertical gap in points.
    Spacer(f32),
    PageBreak,
}

/// Grid table with a styled header row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Column widths in inches.
    pub widths: Vec<f32>,
}

/// Builds the report story.
pub fn build_story(
    rows: &[MedicineRecord],
    filters: &FilterSet,
    statistics: &Statistics,
    options: &PdfOptions,
) -> Vec<Element> {
    let mut story = vec![
        Element::Title("Medicine Data Export Report".to_string()),
        Element::Spacer(12.0),
        Element::Info(vec![
            (
                "Export Date:".to_string(),
                statistics
                    .export_timestamp
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ),
            (
                "Total Medicines:".to_string(),
                statistics.total_medicines.to_string(),
            ),
            ("Filters Applied:".to_string(), filters.describe()),
        ]),
        Element::Spacer(20.0),
        Element::Heading("Summary Statistics".to_string()),
        Element::Spacer(12.0),
    ];

    push_summary_table(
        &mut story,
        "Top 5 Categories",
        ["Category", "Count"],
        &statistics.top_5_categories,
    );
    push_summary_table(
        &mut story,
        "Top 5 Manufacturers",
        ["Manufacturer", "Medicines Count"],
        &statistics.top_5_manufacturers,
    );
    let classifications: Vec<(String, u64)> = statistics
        .classification_distribution
        .iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    push_summary_table(
        &mut story,
        "Classification Distribution",
        ["Classification", "Count"],
        &classifications,
    );

    if options.include_charts && !options.chart_images.is_empty() {
        push_charts(&mut story, &options.chart_images);
    }

    if !options.include_details && !rows.is_empty() {
        push_details(&mut story, rows);
    }

    story
}

fn push_summary_table(
    story: &mut Vec<Element>,
    title: &str,
    header: [&str; 2],
    entries: &[(String, u64)],
) {
    if entries.is_empty() {
        return;
    }

    story.push(Element::Subheading(title.to_string()));
    story.push(Element::Table(Table {
        header: header.iter().map(|h| h.to_string()).collect(),
        rows: entries
            .iter()
            .map(|(name, count)| vec![name.clone(), count.to_string()])
            .collect(),
        widths: SUMMARY_WIDTHS.to_vec(),
    }));
    story.push(Element::Spacer(20.0));
}

fn push_charts(story: &mut Vec<Element>, images: &[String]) {
    story.push(Element::PageBreak);
    story.push(Element::Heading("Charts".to_string()));
    story.push(Element::Spacer(12.0));

    for (index, encoded) in images.iter().enumerate() {
        match decode_chart(encoded) {
            Ok(image) => story.push(Element::Image(image)),
            Err(reason) => {
                warn!(chart = index + 1, %reason, "Chart image skipped");
                story.push(Element::Note(format!(
                    "Chart {} could not be rendered",
                    index + 1
                )));
            }
        }
        story.push(Element::Spacer(12.0));
    }
}

fn push_details(story: &mut Vec<Element>, rows: &[MedicineRecord]) {
    story.push(Element::PageBreak);
    story.push(Element::Heading("Medicine Details".to_string()));
    story.push(Element::Spacer(12.0));

    story.push(Element::Table(Table {
        header: ["Name", "Category", "Manufacturer", "Classification"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: rows
            .iter()
            .take(DETAIL_ROW_LIMIT)
            .map(|r| {
                vec![
                    clip(&r.medicine_name, NAME_BUDGET),
                    clip(r.category.as_deref().unwrap_or("N/A"), CELL_BUDGET),
                    clip(r.manufacturer.as_deref().unwrap_or("N/A"), CELL_BUDGET),
                    clip(r.classification.as_deref().unwrap_or("N/A"), CELL_BUDGET),
                ]
            })
            .collect(),
        widths: DETAIL_WIDTHS.to_vec(),
    }));

    if rows.len() > DETAIL_ROW_LIMIT {
        story.push(Element::Spacer(12.0));
        story.push(Element::Note(format!(
            "Showing first {} of {} medicines. Use the CSV or Excel export for the complete data.",
            DETAIL_ROW_LIMIT,
            rows.len()
        )));
    }
}

/// Decodes a base64 chart, with or without a `data:image/...;base64,` prefix.
fn decode_chart(encoded: &str) -> Result<DynamicImage, String> {
    let payload = match encoded.split_once(',') {
        Some((scheme, data)) if scheme.starts_with("data:") => data,
        _ => encoded,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("invalid base64: {e}"))?;

    image_crate::load_from_memory(&bytes).map_err(|e| format!("invalid image: {e}"))
}

/// Hard cut at `budget` characters.
fn clip(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}

/// A tiny valid PNG, base64-encoded.
#[cfg(test)]
pub(crate) fn sample_png_base64() -> String {
    use printpdf::image_crate::{ImageOutputFormat, Rgb, RgbImage};
    use std::io::Cursor;

    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([31, 71, 136])));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageOutputFormat::Png)
        .expect("encode test png");
    STANDARD.encode(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use medref_core::aggregate_at;

    fn png_base64() -> String {
        sample_png_base64()
    }

    fn rows(n: usize) -> Vec<MedicineRecord> {
        (0..n)
            .map(|i| {
                MedicineRecord::new(format!("Medicine {i:03}"))
                    .category("Analgesic")
                    .manufacturer("Bayer")
                    .classification("OTC")
            })
            .collect()
    }

    fn story_for(rows: &[MedicineRecord], options: &PdfOptions) -> Vec<Element> {
        let at = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap();
        let stats = aggregate_at(rows, &FilterSet::new(), at);
        build_story(rows, &FilterSet::new(), &stats, options)
    }

    fn count<F: Fn(&Element) -> bool>(story: &[Element], pred: F) -> usize {
        story.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_opening_sections() {
        let story = story_for(&rows(3), &PdfOptions::default());

        assert!(matches!(&story[0], Element::Title(t) if t == "Medicine Data Export Report"));
        match &story[2] {
            Element::Info(lines) => {
                assert_eq!(lines[0].1, "2025-03-14 09:26:53");
                assert_eq!(lines[1].1, "3");
                assert_eq!(lines[2].1, "None");
            }
            other => panic!("expected info block, got {other:?}"),
        }
        assert_eq!(count(&story, |e| matches!(e, Element::Subheading(_))), 3);
    }

    #[test]
    fn test_empty_rows_skip_summary_tables_and_details() {
        let story = story_for(&[], &PdfOptions::default());

        assert_eq!(count(&story, |e| matches!(e, Element::Table(_))), 0);
        assert_eq!(count(&story, |e| matches!(e, Element::PageBreak)), 0);
    }

    #[test]
    fn test_bad_chart_becomes_placeholder() {
        let options = PdfOptions {
            include_details: true,
            include_charts: true,
            chart_images: vec![
                png_base64(),
                "not-an-image!!".to_string(),
                format!("data:image/png;base64,{}", png_base64()),
            ],
        };
        let story = story_for(&rows(2), &options);

        assert_eq!(count(&story, |e| matches!(e, Element::Image(_))), 2);
        let notes: Vec<&String> = story
            .iter()
            .filter_map(|e| match e {
                Element::Note(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(notes, vec!["Chart 2 could not be rendered"]);
    }

    #[test]
    fn test_charts_ignored_when_disabled() {
        let options = PdfOptions {
            include_details: true,
            include_charts: false,
            chart_images: vec![png_base64()],
        };
        let story = story_for(&rows(2), &options);
        assert_eq!(count(&story, |e| matches!(e, Element::Image(_))), 0);
    }

    #[test]
    fn test_detail_table_truncates_at_fifty() {
        let options = PdfOptions {
            include_details: false,
            ..PdfOptions::default()
        };
        let story = story_for(&rows(75), &options);

        let detail = story
            .iter()
            .rev()
            .find_map(|e| match e {
                Element::Table(t) if t.header[0] == "Name" => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(detail.rows.len(), 50);
        assert_eq!(
            count(&story, |e| matches!(e, Element::Note(n) if n.contains("first 50 of 75"))),
            1
        );
    }

    #[test]
    fn test_detail_table_skipped_when_details_requested() {
        let options = PdfOptions {
            include_details: true,
            ..PdfOptions::default()
        };
        let story = story_for(&rows(10), &options);
        assert!(!story
            .iter()
            .any(|e| matches!(e, Element::Table(t) if t.header[0] == "Name")));
    }

    #[test]
    fn test_detail_cells_are_clipped() {
        let long = vec![MedicineRecord::new("X".repeat(45))
            .category("C".repeat(25))];
        let options = PdfOptions {
            include_details: false,
            ..PdfOptions::default()
        };
        let story = story_for(&long, &options);

        let detail = story
            .iter()
            .find_map(|e| match e {
                Element::Table(t) if t.header[0] == "Name" => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(detail.rows[0][0].chars().count(), 30);
        assert_eq!(detail.rows[0][1].chars().count(), 20);
        assert_eq!(detail.rows[0][2], "N/A");
    }
}
