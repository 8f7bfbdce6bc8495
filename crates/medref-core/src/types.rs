//! # Domain Types
//!
//! Core domain types shared by the database layer, the renderers and the API.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ MedicineRecord  │   │   Ingredient    │   │   FilterSet     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  medicine_name  │──►│  name           │   │  category       │       │
//! │  │  category       │   │  strength       │   │  manufacturer   │       │
//! │  │  manufacturer   │   └─────────────────┘   │  classification │       │
//! │  │  dosage_form .. │                         │  dosage_form    │       │
//! │  │  ingredients?   │                         │  search         │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Name-Resolved Records
//! Records reach this crate with category and manufacturer already resolved
//! to display names. Foreign keys never leave the database layer.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// =============================================================================
// Ingredient
// =============================================================================

/// An active ingredient and its strength within one medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Ingredient {
    pub name: String,
    pub strength: Option<String>,
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.strength {
            Some(strength) => write!(f, "{} ({})", self.name, strength),
            None => write!(f, "{}", self.name),
        }
    }
}

// =============================================================================
// Medicine Record
// =============================================================================

/// Scalar columns every record carries, in export order.
pub const BASE_COLUMNS: [&str; 7] = [
    "medicine_name",
    "category",
    "manufacturer",
    "dosage_form",
    "strength",
    "indication",
    "classification",
];

/// Column emitted only when a record carries an ingredient list.
pub const INGREDIENTS_COLUMN: &str = "ingredients";

/// One exported medicine row.
///
/// Optional fields are `None` rather than blank; [`MedicineRecord::normalized`]
/// enforces that once, at the fetch boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicineRecord {
    /// Display name of the medicine.
    pub medicine_name: String,

    /// Category name (resolved from the category table).
    pub category: Option<String>,

    /// Manufacturer name (resolved from the manufacturer table).
    pub manufacturer: Option<String>,

    /// Tablet, syrup, injection, ...
    pub dosage_form: Option<String>,

    /// Strength as printed on the label (e.g. "500 mg").
    pub strength: Option<String>,

    /// What the medicine treats.
    pub indication: Option<String>,

    /// Regulatory classification (e.g. "Prescription", "OTC").
    pub classification: Option<String>,

    /// Ingredient list, present only when the fetch asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
}

impl MedicineRecord {
    /// Creates a record with only a name; remaining fields via builder methods.
    pub fn new(medicine_name: impl Into<String>) -> Self {
        MedicineRecord {
            medicine_name: medicine_name.into(),
            ..Default::default()
        }
    }

    /// Sets the category name.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Sets the manufacturer name.
    pub fn manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Sets the classification.
    pub fn classification(mut self, classification: impl Into<String>) -> Self {
        self.classification = Some(classification.into());
        self
    }

    /// Sets the dosage form.
    pub fn dosage_form(mut self, dosage_form: impl Into<String>) -> Self {
        self.dosage_form = Some(dosage_form.into());
        self
    }

    /// Attaches an ingredient list.
    pub fn ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    /// Trims every text field and turns blank optionals into `None`.
    ///
    /// ## Why Here?
    /// The database may hold `''` where a value is missing. Normalizing once
    /// lets statistics and renderers treat `None` as the only "missing" form.
    pub fn normalized(self) -> Self {
        MedicineRecord {
            medicine_name: self.medicine_name.trim().to_string(),
            category: non_blank(self.category),
            manufacturer: non_blank(self.manufacturer),
            dosage_form: non_blank(self.dosage_form),
            strength: non_blank(self.strength),
            indication: non_blank(self.indication),
            classification: non_blank(self.classification),
            ingredients: self.ingredients,
        }
    }

    /// Column keys this record exposes, in export order.
    ///
    /// Tabular renderers take the header from the FIRST record only.
    pub fn column_keys(&self) -> Vec<&'static str> {
        let mut keys = BASE_COLUMNS.to_vec();
        if self.ingredients.is_some() {
            keys.push(INGREDIENTS_COLUMN);
        }
        keys
    }

    /// Looks up a column value by key. Unknown keys and nulls yield `None`.
    pub fn column_value(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "medicine_name" => Some(Cow::Borrowed(self.medicine_name.as_str())),
            "category" => self.category.as_deref().map(Cow::Borrowed),
            "manufacturer" => self.manufacturer.as_deref().map(Cow::Borrowed),
            "dosage_form" => self.dosage_form.as_deref().map(Cow::Borrowed),
            "strength" => self.strength.as_deref().map(Cow::Borrowed),
            "indication" => self.indication.as_deref().map(Cow::Borrowed),
            "classification" => self.classification.as_deref().map(Cow::Borrowed),
            INGREDIENTS_COLUMN => self.ingredients.as_ref().map(|list| {
                Cow::Owned(
                    list.iter()
                        .map(Ingredient::to_string)
                        .collect::<Vec<_>>()
                        .join("; "),
                )
            }),
            _ => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A record together with its database identifier.
///
/// Returned by the repository search and detail lookups; exports never carry IDs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MedicineDetail {
    pub medicine_id: i64,
    #[serde(flatten)]
    pub record: MedicineRecord,
}

/// Distinct values available for the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FilterOptions {
    pub manufacturers: Vec<String>,
    pub categories: Vec<String>,
    pub dosage_forms: Vec<String>,
    pub classifications: Vec<String>,
}

// =============================================================================
// Filter Set
// =============================================================================

/// Client-supplied constraints applied before statistics and rendering.
///
/// ## Matching Rules
/// ```text
/// category, manufacturer   → case-insensitive substring
/// search                   → case-insensitive substring of name OR indication
/// classification,
/// dosage_form              → exact match
/// anything else            → carried for display only
/// ```
///
/// Blank values are never stored, so an empty set means "no constraint".
/// Keys iterate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct FilterSet(BTreeMap<String, String>);

impl FilterSet {
    pub const CATEGORY: &'static str = "category";
    pub const MANUFACTURER: &'static str = "manufacturer";
    pub const CLASSIFICATION: &'static str = "classification";
    pub const DOSAGE_FORM: &'static str = "dosage_form";
    pub const SEARCH: &'static str = "search";

    /// Creates an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a constraint. Blank values remove the key instead.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into().trim().to_string();
        if value.is_empty() {
            self.0.remove(&key);
        } else {
            self.0.insert(key, value);
        }
    }

    /// Returns the value for a key, if constrained.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn category(&self) -> Option<&str> {
        self.get(Self::CATEGORY)
    }

    pub fn manufacturer(&self) -> Option<&str> {
        self.get(Self::MANUFACTURER)
    }

    pub fn classification(&self) -> Option<&str> {
        self.get(Self::CLASSIFICATION)
    }

    pub fn dosage_form(&self) -> Option<&str> {
        self.get(Self::DOSAGE_FORM)
    }

    pub fn search(&self) -> Option<&str> {
        self.get(Self::SEARCH)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Human-readable summary: `key: value, key: value`, or `None`.
    pub fn describe(&self) -> String {
        if self.is_empty() {
            return "None".to_string();
        }
        self.iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// Accepts any JSON object; non-string values are coerced to their string
/// form and `null` drops the key.
impl<'de> Deserialize<'de> for FilterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
        let mut set = FilterSet::new();
        for (key, value) in raw.unwrap_or_default() {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => set.insert(key, s),
                other => set.insert(key, other.to_string()),
            }
        }
        Ok(set)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_turns_blanks_into_none() {
        let record = MedicineRecord {
            medicine_name: "  Aspirin ".to_string(),
            category: Some("   ".to_string()),
            manufacturer: Some(" Bayer ".to_string()),
            classification: Some(String::new()),
            ..Default::default()
        }
        .normalized();

        assert_eq!(record.medicine_name, "Aspirin");
        assert_eq!(record.category, None);
        assert_eq!(record.manufacturer.as_deref(), Some("Bayer"));
        assert_eq!(record.classification, None);
    }

    #[test]
    fn test_column_keys_include_ingredients_only_when_present() {
        let plain = MedicineRecord::new("Aspirin");
        assert_eq!(plain.column_keys(), BASE_COLUMNS.to_vec());

        let detailed = MedicineRecord::new("Aspirin").ingredients(vec![]);
        assert_eq!(detailed.column_keys().last(), Some(&INGREDIENTS_COLUMN));
    }

    #[test]
    fn test_column_value_formats_ingredients() {
        let record = MedicineRecord::new("Co-codamol").ingredients(vec![
            Ingredient {
                name: "Codeine".to_string(),
                strength: Some("8 mg".to_string()),
            },
            Ingredient {
                name: "Paracetamol".to_string(),
                strength: None,
            },
        ]);

        assert_eq!(
            record.column_value(INGREDIENTS_COLUMN).as_deref(),
            Some("Codeine (8 mg); Paracetamol")
        );
        assert_eq!(record.column_value("category"), None);
        assert_eq!(record.column_value("price"), None);
    }

    #[test]
    fn test_filter_set_drops_blank_values() {
        let filters = FilterSet::new()
            .with("category", "Analgesic")
            .with("manufacturer", "   ");

        assert_eq!(filters.len(), 1);
        assert_eq!(filters.category(), Some("Analgesic"));
        assert_eq!(filters.manufacturer(), None);
    }

    #[test]
    fn test_filter_set_describe() {
        assert_eq!(FilterSet::new().describe(), "None");

        let filters = FilterSet::new()
            .with("manufacturer", "Bayer")
            .with("category", "Analgesic");
        assert_eq!(filters.describe(), "category: Analgesic, manufacturer: Bayer");
    }

    #[test]
    fn test_filter_set_coerces_non_string_values() {
        let filters: FilterSet = serde_json::from_str(
            r#"{"category": "Antibiotic", "strength": 500, "otc": true, "manufacturer": null}"#,
        )
        .unwrap();

        assert_eq!(filters.category(), Some("Antibiotic"));
        assert_eq!(filters.get("strength"), Some("500"));
        assert_eq!(filters.get("otc"), Some("true"));
        assert_eq!(filters.manufacturer(), None);
    }

    #[test]
    fn test_filter_set_accepts_null_body() {
        let filters: FilterSet = serde_json::from_str("null").unwrap();
        assert!(filters.is_empty());
    }

    #[test]
    fn test_medicine_detail_flattens_record() {
        let detail = MedicineDetail {
            medicine_id: 7,
            record: MedicineRecord::new("Aspirin").category("Analgesic"),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["medicine_id"], 7);
        assert_eq!(json["medicine_name"], "Aspirin");
        assert_eq!(json["category"], "Analgesic");
        assert!(json.get("ingredients").is_none());
    }
}
