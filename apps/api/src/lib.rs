//! # MedRef API
//!
//! HTTP server for the medicine export panel: filtered exports in four
//! formats plus the browse endpoints that feed the filter dropdowns.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Routes                                    │
//! │                                                                         │
//! │  ┌────────────────────────┐  ┌──────────────────┐  ┌────────────────┐  │
//! │  │  export                │  │  medicines       │  │  health        │  │
//! │  │                        │  │                  │  │                │  │
//! │  │ • POST csv/json/       │  │ • GET search     │  │ • GET /health  │  │
//! │  │        excel/pdf       │  │ • GET filters    │  │                │  │
//! │  │ • GET formats          │  │ • GET {id}       │  │                │  │
//! │  └───────────┬────────────┘  └────────┬─────────┘  └───────┬────────┘  │
//! │              │                        │                    │           │
//! │  ┌───────────▼────────────────────────▼────────────────────▼────────┐  │
//! │  │                      Infrastructure                              │  │
//! │  │                                                                  │  │
//! │  │  ┌──────────────────┐  ┌──────────────────┐  ┌────────────────┐ │  │
//! │  │  │  SQLite          │  │  medref-export   │  │  tower-http    │ │  │
//! │  │  │  (medref-db)     │  │  renderers on    │  │  trace + CORS  │ │  │
//! │  │  │                  │  │  blocking pool   │  │                │ │  │
//! │  │  └──────────────────┘  └──────────────────┘  └────────────────┘ │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]: `medref.toml` plus `MEDREF_*` environment variables.

pub mod config;
pub mod error;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::build_router;

use medref_db::Database;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
}
