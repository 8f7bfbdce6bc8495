//! HTTP router.
//!
//! ```text
//! POST /api/export/csv            ─┐
//! POST /api/export/json            │ export
//! POST /api/export/excel           │
//! POST /api/export/pdf             │
//! GET  /api/export/formats        ─┘
//! GET  /api/medicines             ─┐
//! GET  /api/medicines/filters      │ browse
//! GET  /api/medicines/{id}        ─┘
//! GET  /health
//! ```
//!
//! Layers (outermost first): CORS (optional) → trace → body limit.

pub mod export;
pub mod health;
pub mod medicines;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;
    let cors_permissive = state.config.cors_permissive;

    let router = Router::new()
        .route("/api/export/csv", post(export::export_csv))
        .route("/api/export/json", post(export::export_json))
        .route("/api/export/excel", post(export::export_excel))
        .route("/api/export/pdf", post(export::export_pdf))
        .route("/api/export/formats", get(export::formats))
        .route("/api/medicines", get(medicines::search))
        .route("/api/medicines/filters", get(medicines::filter_options))
        .route("/api/medicines/{id}", get(medicines::detail))
        .route("/health", get(health::check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http());

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use medref_core::{Ingredient, MedicineRecord};
    use medref_db::{Database, DbConfig};
    use tower::ServiceExt;

    use crate::config::ApiConfig;

    async fn test_app() -> Router {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medicines();

        repo.insert(
            &MedicineRecord::new("Aspirin")
                .category("Analgesic")
                .manufacturer("Bayer")
                .classification("OTC")
                .ingredients(vec![Ingredient {
                    name: "Acetylsalicylic acid".to_string(),
                    strength: Some("500 mg".to_string()),
                }]),
        )
        .await
        .unwrap();
        repo.insert(
            &MedicineRecord::new("Tylenol")
                .category("Analgesic")
                .manufacturer("J&J"),
        )
        .await
        .unwrap();
        repo.insert(&MedicineRecord::new("Advil").manufacturer("Pfizer"))
            .await
            .unwrap();

        build_router(Arc::new(AppState {
            db,
            config: ApiConfig::default(),
        }))
    }

    async fn send(app: Router, method: &str, uri: &str, body: &str) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    fn header_str<'a>(response: &'a Response<Body>, name: header::HeaderName) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    #[tokio::test]
    async fn test_formats() {
        let response = send(test_app().await, "GET", "/api/export/formats", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let names: Vec<&str> = json["formats"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["CSV", "JSON", "Excel", "PDF"]);
    }

    #[tokio::test]
    async fn test_csv_export_with_filters() {
        let response = send(
            test_app().await,
            "POST",
            "/api/export/csv?include_details=false",
            r#"{"filters": {"category": "analg"}}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "text/csv");
        assert!(header_str(&response, header::CONTENT_DISPOSITION)
            .starts_with("attachment; filename=medicine_export_"));

        let text = String::from_utf8(body_bytes(response).await).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("medicine_name,category,manufacturer"));
        assert!(!lines[0].contains("ingredients"));
        // Aspirin and Tylenol, ordered by name
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Aspirin,"));
    }

    #[tokio::test]
    async fn test_csv_export_defaults_to_ingredients() {
        let response = send(test_app().await, "POST", "/api/export/csv", "").await;
        let text = String::from_utf8(body_bytes(response).await).unwrap();

        // Advil sorts first and has no ingredients, but the column is present
        assert!(text.lines().next().unwrap().ends_with(",ingredients"));
        assert!(text.contains("Acetylsalicylic acid (500 mg)"));
    }

    #[tokio::test]
    async fn test_json_export_statistics_flag() {
        let response = send(test_app().await, "POST", "/api/export/json", "{}").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["export_info"]["total_records"], 3);
        assert_eq!(json["statistics"]["category_distribution"]["Analgesic"], 2);
        assert_eq!(json["statistics"]["category_distribution"]["Unknown"], 1);

        let response = send(
            test_app().await,
            "POST",
            "/api/export/json?include_statistics=false",
            r#"{"include_statistics": true}"#,
        )
        .await;
        let json = body_json(response).await;
        assert!(json.get("statistics").is_none());
    }

    #[tokio::test]
    async fn test_excel_export() {
        let response = send(test_app().await, "POST", "/api/export/excel", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_str(&response, header::CONTENT_TYPE),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert!(body_bytes(response).await.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_pdf_export_with_bad_chart() {
        let response = send(
            test_app().await,
            "POST",
            "/api/export/pdf",
            r#"{"chart_images": ["definitely not base64"]}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_str(&response, header::CONTENT_TYPE), "application/pdf");
        assert!(header_str(&response, header::CONTENT_DISPOSITION).ends_with(".pdf"));
        assert!(body_bytes(response).await.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_empty_result_export() {
        let response = send(
            test_app().await,
            "POST",
            "/api/export/csv",
            r#"{"filters": {"manufacturer": "Nobody"}}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_export_rejects_bad_input() {
        let response = send(test_app().await, "POST", "/api/export/json", "{oops").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let long = "x".repeat(101);
        let body = format!(r#"{{"filters": {{"category": "{long}"}}}}"#);
        let response = send(test_app().await, "POST", "/api/export/csv", &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_malformed_query_flag_is_json_400() {
        let response = send(
            test_app().await,
            "POST",
            "/api/export/csv?include_details=maybe",
            "",
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            header_str(&response, header::CONTENT_TYPE),
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        let message = json["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Failed to deserialize query string"));
        assert!(message.contains("include_details"));

        let response = send(test_app().await, "GET", "/api/medicines?limit=ten", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");

        let response = send(test_app().await, "GET", "/api/medicines/abc", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_medicine_search() {
        let response = send(test_app().await, "GET", "/api/medicines?q=asp", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let results = json["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], "Aspirin");
        assert_eq!(results[0]["category_name"], "Analgesic");
        assert_eq!(results[0]["manufacturer_name"], "Bayer");
        assert!(results[0].get("ingredients").is_none());

        let response = send(test_app().await, "GET", "/api/medicines?limit=0", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_filter_options() {
        let response = send(test_app().await, "GET", "/api/medicines/filters", "").await;
        let json = body_json(response).await;
        assert_eq!(
            json["manufacturers"],
            serde_json::json!(["Bayer", "J&J", "Pfizer"])
        );
        assert_eq!(json["categories"], serde_json::json!(["Analgesic"]));
    }

    #[tokio::test]
    async fn test_medicine_detail() {
        let app = test_app().await;
        let response = send(app.clone(), "GET", "/api/medicines/1", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["name"], "Aspirin");
        assert_eq!(json["manufacturer_name"], "Bayer");
        assert_eq!(json["ingredients"][0]["name"], "Acetylsalicylic acid");
        assert_eq!(json["ingredients"][0]["strength"], "500 mg");

        let response = send(app.clone(), "GET", "/api/medicines/999", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");

        let response = send(app, "GET", "/api/medicines/0", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(test_app().await, "GET", "/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["api"], "healthy");
        assert_eq!(json["database"]["status"], "connected");
        assert_eq!(json["database"]["medicines"], 3);
        assert_eq!(json["database"]["categories"], 1);
    }
}
