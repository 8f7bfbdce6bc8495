//! # medref-core: Pure Domain Logic for MedRef
//!
//! This crate holds the medicine reference domain as pure functions and
//! plain data, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         MedRef Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (export panel)                      │   │
//! │  │    Filters ──► Charts ──► "Export as CSV / JSON / XLSX / PDF"   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  └───────────┬─────────────────────────────────────┬───────────────┘   │
//! │              │                                     │                    │
//! │  ┌───────────▼───────────┐             ┌───────────▼───────────┐       │
//! │  │      medref-db        │             │    medref-export      │       │
//! │  │  row fetcher, search  │             │  csv/json/xlsx/pdf    │       │
//! │  └───────────┬───────────┘             └───────────┬───────────┘       │
//! │              │                                     │                    │
//! │  ┌───────────▼─────────────────────────────────────▼───────────────┐   │
//! │  │               ★ medref-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ statistics │  │ validation│  │   error   │  │   │
//! │  │   │  Record   │  │ aggregate  │  │  limits   │  │ Validation│  │   │
//! │  │   │ FilterSet │  │ top-5      │  │  lengths  │  │           │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MedicineRecord, Ingredient, FilterSet)
//! - [`statistics`] - Frequency distributions and top-5 rankings
//! - [`error`] - Validation error type
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use medref_core::{aggregate, FilterSet, MedicineRecord};
//!
//! let rows = vec![
//!     MedicineRecord::new("Aspirin").category("Analgesic").manufacturer("Bayer"),
//!     MedicineRecord::new("Tylenol").category("Analgesic").manufacturer("J&J"),
//! ];
//!
//! let stats = aggregate(&rows, &FilterSet::new());
//! assert_eq!(stats.total_medicines, 2);
//! assert_eq!(stats.top_5_categories[0], ("Analgesic".to_string(), 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod statistics;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use statistics::{aggregate, aggregate_at, Distribution, Statistics};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Grouping key used when a record has no category, manufacturer or
/// classification.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Length of the top-N ranking lists.
pub const TOP_N: usize = 5;

/// Search results returned when the client names no limit.
pub const DEFAULT_SEARCH_LIMIT: u32 = 50;

/// Upper bound on a client-supplied search limit.
pub const MAX_SEARCH_LIMIT: u32 = 500;

/// Longest accepted search query or filter value, in characters.
pub const MAX_FILTER_VALUE_LEN: usize = 100;
