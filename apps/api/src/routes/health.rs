//! Health check endpoint.
//!
//! ```text
//! { "api": "healthy",
//!   "database": { "status": "connected", "medicines": 412, "manufacturers": 8, "categories": 6 } }
//!
//! { "api": "healthy",
//!   "database": { "status": "error", "message": "Connection failed: Pool is closed" } }
//! ```

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use medref_db::TableCounts;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub api: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DatabaseHealth {
    Connected {
        #[serde(flatten)]
        counts: TableCounts,
    },
    Error {
        message: String,
    },
}

/// `GET /health` - API liveness plus database connectivity.
///
/// Always answers 200; a database failure is reported in the body.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = match state.db.table_counts().await {
        Ok(counts) => DatabaseHealth::Connected { counts },
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            DatabaseHealth::Error {
                message: e.to_string(),
            }
        }
    };

    Json(HealthResponse {
        api: "healthy",
        database,
    })
}
