//! # medref-export: Document Renderers for MedRef
//!
//! Encodes a fetched medicine row set, its filters and its statistics into
//! a downloadable document.
//!
//! ## Render Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Vec<MedicineRecord> ──┐                                               │
//! │   FilterSet ────────────┼──► ExportInput ──► dyn FormatRenderer         │
//! │   Statistics ───────────┘                         │                     │
//! │                                                   ▼                     │
//! │                              ExportDocument { format, bytes, filename } │
//! │                                                                         │
//! │   CSV   header from first record, CRLF rows                             │
//! │   JSON  export_info + data (+ statistics)                               │
//! │   Excel "Medicine Data" + "Statistics" sheets                           │
//! │   PDF   summary tables, charts, first 50 rows                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - The four formats, their MIME types and filenames
//! - [`document`] - Renderer trait and the rendered document
//! - [`renderers`] - One encoder per format
//! - [`error`] - Render errors
//!
//! Everything here is synchronous and CPU-bound.
//!
//! ## Example Usage
//!
//! ```rust
//! use medref_core::{aggregate, FilterSet, MedicineRecord};
//! use medref_export::{render_json, ExportFormat};
//!
//! let rows = vec![MedicineRecord::new("Aspirin").category("Analgesic")];
//! let filters = FilterSet::new();
//! let stats = aggregate(&rows, &filters);
//!
//! let doc = render_json(&rows, &filters, &stats, true).unwrap();
//! assert_eq!(doc.format, ExportFormat::Json);
//! assert!(doc.filename.ends_with(".json"));
//! ```

pub mod catalog;
pub mod document;
pub mod error;
pub mod renderers;

pub use catalog::{list_formats, ExportFormat, FormatDescriptor};
pub use document::{ExportDocument, ExportInput, FormatRenderer};
pub use error::{RenderError, RenderResult};
pub use renderers::{
    render_csv, render_json, render_pdf, render_spreadsheet, CsvRenderer, JsonRenderer,
    PdfOptions, PdfRenderer, SpreadsheetRenderer,
};
