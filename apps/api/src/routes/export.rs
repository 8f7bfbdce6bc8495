//! # Export Endpoints
//!
//! ```text
//! POST /api/export/{csv,json,excel,pdf}?include_details=&include_statistics=&include_charts=
//!      body: { "filters": {...}, "chart_images": [...], "include_*": bool }   (all optional)
//!
//!   validate filters ─► fetch rows (one read transaction)
//!        │
//!        ▼  spawn_blocking
//!   aggregate statistics ─► FormatRenderer::render
//!        │
//!        ▼
//!   200 bytes + Content-Type + Content-Disposition: attachment; filename=...
//! ```
//!
//! A flag in the query string wins over the same flag in the body, which
//! wins over the endpoint default. A flag that is not `true`/`false` is a
//! 400 with the usual error body, wherever it appears.
//!
//! `include_details` attaches ingredient lists to CSV, JSON and Excel rows.
//! For the PDF report it keeps its inverted meaning: the detail table is
//! drawn only when the flag is `false`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use medref_core::validation::validate_filters;
use medref_core::{aggregate, FilterSet};
use medref_export::{
    list_formats, CsvRenderer, ExportDocument, ExportFormat, ExportInput, FormatDescriptor,
    FormatRenderer, JsonRenderer, PdfOptions, PdfRenderer, SpreadsheetRenderer,
};

use crate::error::ApiError;
use crate::AppState;

// =============================================================================
// Request Shapes
// =============================================================================

/// Boolean switches, accepted in the query string and in the body.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ExportFlags {
    pub include_details: Option<bool>,
    pub include_statistics: Option<bool>,
    pub include_charts: Option<bool>,
}

impl ExportFlags {
    /// Query flags first, then body flags.
    fn or(self, fallback: ExportFlags) -> ExportFlags {
        ExportFlags {
            include_details: self.include_details.or(fallback.include_details),
            include_statistics: self.include_statistics.or(fallback.include_statistics),
            include_charts: self.include_charts.or(fallback.include_charts),
        }
    }
}

/// JSON request body. An empty body means "no filters, no charts".
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    pub filters: FilterSet,
    pub chart_images: Vec<String>,
    #[serde(flatten)]
    pub flags: ExportFlags,
}

impl ExportRequest {
    fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(ExportRequest::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid export request body: {e}")))
    }
}

#[derive(Debug, Serialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatDescriptor>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/export/csv`
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExportFlags>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = ExportRequest::parse(&body)?;
    let flags = query.or(request.flags);
    let with_ingredients = flags.include_details.unwrap_or(true);

    run_export(&state, request.filters, with_ingredients, Box::new(CsvRenderer)).await
}

/// `POST /api/export/json`
pub async fn export_json(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExportFlags>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = ExportRequest::parse(&body)?;
    let flags = query.or(request.flags);
    let renderer = JsonRenderer {
        include_statistics: flags.include_statistics.unwrap_or(true),
    };

    run_export(
        &state,
        request.filters,
        flags.include_details.unwrap_or(true),
        Box::new(renderer),
    )
    .await
}

/// `POST /api/export/excel`
pub async fn export_excel(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExportFlags>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = ExportRequest::parse(&body)?;
    let flags = query.or(request.flags);
    let renderer = SpreadsheetRenderer {
        include_charts: flags.include_charts.unwrap_or(true),
    };

    run_export(
        &state,
        request.filters,
        flags.include_details.unwrap_or(true),
        Box::new(renderer),
    )
    .await
}

/// `POST /api/export/pdf`
pub async fn export_pdf(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExportFlags>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let request = ExportRequest::parse(&body)?;
    let flags = query.or(request.flags);
    let renderer = PdfRenderer {
        options: PdfOptions {
            include_details: flags.include_details.unwrap_or(false),
            include_charts: flags.include_charts.unwrap_or(true),
            chart_images: request.chart_images,
        },
    };

    // The report's detail table has no ingredient column
    run_export(&state, request.filters, false, Box::new(renderer)).await
}

/// `GET /api/export/formats`
pub async fn formats() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: list_formats(),
    })
}

// =============================================================================
// Pipeline
// =============================================================================

/// Fetch, aggregate and render one export.
///
/// Aggregation and rendering run on the blocking pool; the request still
/// waits for the finished document.
async fn run_export(
    state: &AppState,
    filters: FilterSet,
    with_ingredients: bool,
    renderer: Box<dyn FormatRenderer>,
) -> Result<Response, ApiError> {
    let format = renderer.format();
    validate_filters(&filters)?;

    debug!(format = format.name(), filters = %filters, "Export requested");

    let rows = state
        .db
        .medicines()
        .fetch_for_export(&filters, with_ingredients)
        .await
        .map_err(|e| ApiError::render(format, e))?;

    let document = tokio::task::spawn_blocking(move || {
        let statistics = aggregate(&rows, &filters);
        renderer.render(&ExportInput {
            rows: &rows,
            filters: &filters,
            statistics: &statistics,
        })
    })
    .await
    .map_err(|e| ApiError::render(format, e))?
    .map_err(|e| ApiError::render(format, e))?;

    info!(
        format = format.name(),
        bytes = document.bytes.len(),
        filename = %document.filename,
        "Export rendered"
    );
    Ok(attachment(document))
}

fn attachment(document: ExportDocument) -> Response {
    let headers = [
        (header::CONTENT_TYPE, document.mime_type().to_string()),
        (header::CONTENT_DISPOSITION, document.content_disposition()),
    ];
    (headers, document.bytes).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_default_request() {
        let request = ExportRequest::parse(b"").unwrap();
        assert!(request.filters.is_empty());
        assert!(request.chart_images.is_empty());

        let request = ExportRequest::parse(b"  \n").unwrap();
        assert!(request.filters.is_empty());
    }

    #[test]
    fn test_body_carries_filters_charts_and_flags() {
        let request = ExportRequest::parse(
            br#"{
                "filters": {"category": "Analgesic", "manufacturer": ""},
                "chart_images": ["data:image/png;base64,AAAA"],
                "include_charts": false
            }"#,
        )
        .unwrap();

        assert_eq!(request.filters.category(), Some("Analgesic"));
        assert_eq!(request.filters.manufacturer(), None);
        assert_eq!(request.chart_images.len(), 1);
        assert_eq!(request.flags.include_charts, Some(false));
        assert_eq!(request.flags.include_details, None);
    }

    #[test]
    fn test_null_filters_accepted() {
        let request = ExportRequest::parse(br#"{"filters": null}"#).unwrap();
        assert!(request.filters.is_empty());
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        assert!(matches!(
            ExportRequest::parse(b"{not json"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_query_flags_win() {
        let query = ExportFlags {
            include_statistics: Some(true),
            ..ExportFlags::default()
        };
        let body = ExportFlags {
            include_statistics: Some(false),
            include_details: Some(false),
            include_charts: None,
        };

        let merged = query.or(body);
        assert_eq!(merged.include_statistics, Some(true));
        assert_eq!(merged.include_details, Some(false));
        assert_eq!(merged.include_charts, None);
    }
}
