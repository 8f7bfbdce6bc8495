//! Format renderers, one module per export format.

pub mod csv;
pub mod json;
pub mod pdf;
pub mod spreadsheet;

pub use self::csv::{render_csv, CsvRenderer};
pub use self::json::{render_json, JsonRenderer};
pub use self::pdf::{render_pdf, PdfOptions, PdfRenderer};
pub use self::spreadsheet::{render_spreadsheet, SpreadsheetRenderer};
