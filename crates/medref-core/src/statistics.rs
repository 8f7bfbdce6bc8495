//! # Statistics Aggregator
//!
//! Derives frequency distributions and top-N rankings from a fetched row set.
//!
//! ## Single Pass
//! ```text
//! rows ──► for each record ──┬──► category tally       ──┐
//!                            ├──► manufacturer tally   ──┼──► Statistics
//!                            └──► classification tally ──┘      │
//!                                                               ├─ top_5_categories
//!                                                               └─ top_5_manufacturers
//! ```
//!
//! Every record lands in each tally exactly once; a missing key counts as
//! [`UNKNOWN_LABEL`]. Tallies remember first-encounter order, and the top-N
//! lists come from a stable sort, so ties keep that order. Since the row
//! fetcher orders by name, identical data always yields identical rankings.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::types::{FilterSet, MedicineRecord};
use crate::{TOP_N, UNKNOWN_LABEL};

// =============================================================================
// Distribution
// =============================================================================

/// Name → count mapping that remembers first-encounter order.
///
/// Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    entries: Vec<(String, u64)>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one to `key`, appending it if unseen.
    pub fn increment(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, count)| *count)
    }

    /// Iterates entries in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// The `n` largest entries, count descending, ties in encounter order.
    pub fn top(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

impl Serialize for Distribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, count) in &self.entries {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = Distribution;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, count)) = access.next_entry::<String, u64>()? {
                    entries.push((name, count));
                }
                Ok(Distribution { entries })
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Aggregate view of one export's row set.
///
/// Computed once per request and shared by every renderer, so all formats
/// report the same timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Statistics {
    pub total_medicines: u64,

    pub filters_applied: FilterSet,

    #[ts(as = "String")]
    pub export_timestamp: NaiveDateTime,

    #[ts(as = "std::collections::HashMap<String, u64>")]
    pub category_distribution: Distribution,

    #[ts(as = "std::collections::HashMap<String, u64>")]
    pub manufacturer_distribution: Distribution,

    #[ts(as = "std::collections::HashMap<String, u64>")]
    pub classification_distribution: Distribution,

    pub top_5_categories: Vec<(String, u64)>,

    pub top_5_manufacturers: Vec<(String, u64)>,
}

/// Aggregates `rows`, stamping the result with the current local time.
pub fn aggregate(rows: &[MedicineRecord], filters: &FilterSet) -> Statistics {
    aggregate_at(rows, filters, Local::now().naive_local())
}

/// Aggregates `rows` with an explicit timestamp.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use medref_core::{aggregate_at, FilterSet, MedicineRecord};
///
/// let rows = vec![
///     MedicineRecord::new("Aspirin").category("Analgesic"),
///     MedicineRecord::new("Advil"),
/// ];
/// let at = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let stats = aggregate_at(&rows, &FilterSet::new(), at);
///
/// assert_eq!(stats.total_medicines, 2);
/// assert_eq!(stats.category_distribution.get("Unknown"), Some(1));
/// ```
pub fn aggregate_at(
    rows: &[MedicineRecord],
    filters: &FilterSet,
    at: NaiveDateTime,
) -> Statistics {
    let mut categories = Distribution::new();
    let mut manufacturers = Distribution::new();
    let mut classifications = Distribution::new();

    for record in rows {
        categories.increment(group_key(record.category.as_deref()));
        manufacturers.increment(group_key(record.manufacturer.as_deref()));
        classifications.increment(group_key(record.classification.as_deref()));
    }

    Statistics {
        total_medicines: rows.len() as u64,
        filters_applied: filters.clone(),
        export_timestamp: at,
        top_5_categories: categories.top(TOP_N),
        top_5_manufacturers: manufacturers.top(TOP_N),
        category_distribution: categories,
        manufacturer_distribution: manufacturers,
        classification_distribution: classifications,
    }
}

fn group_key(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN_LABEL,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
