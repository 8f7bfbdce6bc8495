//! Medicine browse endpoints: search, filter dropdowns, detail.
//!
//! The browse page reads `name`, `category_name` and `manufacturer_name`,
//! so results go out as [`MedicineView`] rather than the export row shape.

use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use medref_core::validation::{
    validate_filters, validate_medicine_id, validate_search_limit, validate_search_query,
};
use medref_core::{FilterOptions, FilterSet, Ingredient, MedicineDetail};

use crate::error::ApiError;
use crate::AppState;

/// Query string of `GET /api/medicines`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub manufacturer: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

/// One medicine as the browse page sees it.
#[derive(Debug, Serialize)]
pub struct MedicineView {
    pub medicine_id: i64,
    pub name: String,
    pub category_name: Option<String>,
    pub manufacturer_name: Option<String>,
    pub dosage_form: Option<String>,
    pub strength: Option<String>,
    pub indication: Option<String>,
    pub classification: Option<String>,
    /// Only the detail endpoint lists ingredients.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
}

impl From<MedicineDetail> for MedicineView {
    fn from(detail: MedicineDetail) -> Self {
        let record = detail.record;
        MedicineView {
            medicine_id: detail.medicine_id,
            name: record.medicine_name,
            category_name: record.category,
            manufacturer_name: record.manufacturer,
            dosage_form: record.dosage_form,
            strength: record.strength,
            indication: record.indication,
            classification: record.classification,
            ingredients: record.ingredients,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<MedicineView>,
}

/// `GET /api/medicines?q=&manufacturer=&category=&limit=`
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params?;
    let query = validate_search_query(&params.q)?;
    let limit = validate_search_limit(params.limit)?;

    let mut narrowing = FilterSet::new();
    if let Some(manufacturer) = &params.manufacturer {
        narrowing.insert(FilterSet::MANUFACTURER, manufacturer.as_str());
    }
    if let Some(category) = &params.category {
        narrowing.insert(FilterSet::CATEGORY, category.as_str());
    }
    validate_filters(&narrowing)?;

    let results = state
        .db
        .medicines()
        .search(&query, narrowing.manufacturer(), narrowing.category(), limit)
        .await?;

    debug!(query = %query, count = results.len(), "Medicine search");
    Ok(Json(SearchResponse {
        results: results.into_iter().map(MedicineView::from).collect(),
    }))
}

/// `GET /api/medicines/filters`
pub async fn filter_options(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FilterOptions>, ApiError> {
    Ok(Json(state.db.medicines().filter_options().await?))
}

/// `GET /api/medicines/{id}`
pub async fn detail(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MedicineView>, ApiError> {
    let Path(id) = id?;
    validate_medicine_id(id)?;
    let detail = state.db.medicines().get_by_id(id).await?;
    Ok(Json(detail.into()))
}
