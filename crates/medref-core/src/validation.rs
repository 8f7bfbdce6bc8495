//! # Validation Module
//!
//! Input validation utilities for MedRef.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── Non-string filter values coerced to strings                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Length limits on search text and filter values                    │
//! │  └── Range checks on limits and IDs                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::FilterSet;
use crate::{DEFAULT_SEARCH_LIMIT, MAX_FILTER_VALUE_LEN, MAX_SEARCH_LIMIT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (returns all/default results)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_FILTER_VALUE_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_FILTER_VALUE_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates every value of a filter set against the same length limit as
/// search queries.
///
/// ## Example
/// ```rust
/// use medref_core::validation::validate_filters;
/// use medref_core::FilterSet;
///
/// let filters = FilterSet::new().with("category", "Analgesic");
/// assert!(validate_filters(&filters).is_ok());
///
/// let filters = FilterSet::new().with("category", "x".repeat(101));
/// assert!(validate_filters(&filters).is_err());
/// ```
pub fn validate_filters(filters: &FilterSet) -> ValidationResult<()> {
    for (key, value) in filters.iter() {
        if value.chars().count() > MAX_FILTER_VALUE_LEN {
            return Err(ValidationError::TooLong {
                field: format!("filters.{key}"),
                max: MAX_FILTER_VALUE_LEN,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a search result limit, substituting the default when absent.
///
/// ## Rules
/// - `None` → [`DEFAULT_SEARCH_LIMIT`]
/// - Must be between 1 and [`MAX_SEARCH_LIMIT`]
pub fn validate_search_limit(limit: Option<i64>) -> ValidationResult<u32> {
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT as i64);

    if !(1..=MAX_SEARCH_LIMIT as i64).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_SEARCH_LIMIT as i64,
        });
    }

    Ok(limit as u32)
}

/// Validates a medicine identifier from a URL path.
pub fn validate_medicine_id(id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "medicine_id".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
