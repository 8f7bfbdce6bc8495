//! # medref-db: Database Layer for MedRef
//!
//! This crate provides database access for the medicine reference service.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MedRef Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (POST /api/export/csv)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    medref-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (medicine.rs)  │   │  (embedded)  │  │   │
//! │  │   │               │    │                │   │              │  │   │
//! │  │   │ SqlitePool    │◄───│ MedicineRepo   │   │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │  fetch/search  │   │              │  │   │
//! │  │   │ Management    │    │  detail/counts │   │              │  │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   medicine ─┬─ category, manufacturer                           │   │
//! │  │             └─ medicine_ingredient ── ingredient                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (medicine)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medref_core::FilterSet;
//! use medref_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/medref.db");
//! let db = Database::new(config).await?;
//!
//! // Rows for an export, ordered by name
//! let filters = FilterSet::new().with("category", "analgesic");
//! let rows = db.medicines().fetch_for_export(&filters, false).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::medicine::{MedicineRepository, TableCounts};
