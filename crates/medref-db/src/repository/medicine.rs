//! # Medicine Repository
//!
//! Database operations for medicines and their reference tables.
//!
//! ## Key Operations
//! - Row fetching for exports (filtered, name-ordered, transaction-scoped)
//! - Search and detail lookups for the browse endpoints
//! - Distinct filter values and table counts
//! - Inserts used by the seed binary and tests
//!
//! ## Name Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  medicine m                                                             │
//! │    ├── LEFT JOIN manufacturer ma ON ma.manufacturer_id = m.…  → name   │
//! │    └── LEFT JOIN category     c  ON c.category_id     = m.…  → name    │
//! │                                                                         │
//! │  LEFT JOINs keep medicines whose category/manufacturer is missing;      │
//! │  those surface as None and later count as "Unknown".                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use medref_core::{FilterOptions, FilterSet, Ingredient, MedicineDetail, MedicineRecord};

/// Shared projection: every query that returns records selects these columns.
const RECORD_SELECT: &str = r#"
    SELECT
        m.medicine_id,
        m.name AS medicine_name,
        c.name AS category,
        ma.name AS manufacturer,
        m.dosage_form,
        m.strength,
        m.indication,
        m.classification
    FROM medicine m
    LEFT JOIN manufacturer ma ON ma.manufacturer_id = m.manufacturer_id
    LEFT JOIN category c ON c.category_id = m.category_id
"#;

/// One joined medicine row as SQLite returns it.
#[derive(Debug, sqlx::FromRow)]
struct MedicineRow {
    medicine_id: i64,
    medicine_name: String,
    category: Option<String>,
    manufacturer: Option<String>,
    dosage_form: Option<String>,
    strength: Option<String>,
    indication: Option<String>,
    classification: Option<String>,
}

impl MedicineRow {
    fn into_record(self) -> MedicineRecord {
        MedicineRecord {
            medicine_name: self.medicine_name,
            category: self.category,
            manufacturer: self.manufacturer,
            dosage_form: self.dosage_form,
            strength: self.strength,
            indication: self.indication,
            classification: self.classification,
            ingredients: None,
        }
        .normalized()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    medicine_id: i64,
    name: String,
    strength: Option<String>,
}

/// Table sizes reported by the health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TableCounts {
    pub medicines: i64,
    pub manufacturers: i64,
    pub categories: i64,
}

/// Repository for medicine database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = MedicineRepository::new(pool);
///
/// // Rows for an export
/// let filters = FilterSet::new().with("category", "analgesic");
/// let rows = repo.fetch_for_export(&filters, false).await?;
///
/// // Detail with ingredients
/// let detail = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct MedicineRepository {
    pool: SqlitePool,
}

impl MedicineRepository {
    /// Creates a new MedicineRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MedicineRepository { pool }
    }

    // =========================================================================
    // Export Row Fetcher
    // =========================================================================

    /// Fetches every medicine matching `filters`, ordered by name.
    ///
    /// Names compare case-insensitively ("aspirin" sorts before "Zyrtec");
    /// equal names keep insertion order through `medicine_id`.
    ///
    /// ## Matching
    /// - `category`, `manufacturer`: case-insensitive substring of the name
    /// - `search`: case-insensitive substring of medicine name or indication
    /// - `classification`, `dosage_form`: exact
    /// - other keys: ignored here (echoed in reports only)
    ///
    /// ## Transaction Scope
    /// Both queries run inside one transaction. Any `?` exit drops the
    /// transaction, which rolls it back; success commits.
    ///
    /// ## Arguments
    /// * `filters` - Client filter set (blank values already removed)
    /// * `with_ingredients` - Attach each record's ingredient list
    pub async fn fetch_for_export(
        &self,
        filters: &FilterSet,
        with_ingredients: bool,
    ) -> DbResult<Vec<MedicineRecord>> {
        debug!(filters = %filters, with_ingredients, "Fetching export rows");

        let mut tx = self.pool.begin().await?;

        let mut query = QueryBuilder::<Sqlite>::new(RECORD_SELECT);
        push_filters(&mut query, filters);
        query.push(" ORDER BY m.name COLLATE NOCASE, m.medicine_id");

        let rows: Vec<MedicineRow> = query.build_query_as().fetch_all(&mut *tx).await?;

        let mut ingredients = if with_ingredients {
            let mut query = QueryBuilder::<Sqlite>::new(
                r#"
                SELECT mi.medicine_id, i.name, mi.strength
                FROM medicine_ingredient mi
                JOIN ingredient i ON i.ingredient_id = mi.ingredient_id
                WHERE mi.medicine_id IN (
                    SELECT m.medicine_id
                    FROM medicine m
                    LEFT JOIN manufacturer ma ON ma.manufacturer_id = m.manufacturer_id
                    LEFT JOIN category c ON c.category_id = m.category_id
                "#,
            );
            push_filters(&mut query, filters);
            query.push(") ORDER BY mi.medicine_id, i.name");

            let rows: Vec<IngredientRow> = query.build_query_as().fetch_all(&mut *tx).await?;
            group_ingredients(rows)
        } else {
            HashMap::new()
        };

        tx.commit().await?;

        let records: Vec<MedicineRecord> = rows
            .into_iter()
            .map(|row| {
                let id = row.medicine_id;
                let mut record = row.into_record();
                if with_ingredients {
                    record.ingredients = Some(ingredients.remove(&id).unwrap_or_default());
                }
                record
            })
            .collect();

        info!(count = records.len(), "Export rows fetched");
        Ok(records)
    }

    // =========================================================================
    // Browse
    // =========================================================================

    /// Searches medicines for the browse page.
    ///
    /// ## Arguments
    /// * `query` - Substring of name or indication (empty = no constraint)
    /// * `manufacturer` - Substring of manufacturer name
    /// * `category` - Substring of category name
    /// * `limit` - Maximum results to return
    pub async fn search(
        &self,
        query: &str,
        manufacturer: Option<&str>,
        category: Option<&str>,
        limit: u32,
    ) -> DbResult<Vec<MedicineDetail>> {
        debug!(query = %query, limit = %limit, "Searching medicines");

        let mut filters = FilterSet::new().with(FilterSet::SEARCH, query);
        if let Some(manufacturer) = manufacturer {
            filters.insert(FilterSet::MANUFACTURER, manufacturer);
        }
        if let Some(category) = category {
            filters.insert(FilterSet::CATEGORY, category);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(RECORD_SELECT);
        push_filters(&mut builder, &filters);
        builder.push(" ORDER BY m.name COLLATE NOCASE, m.medicine_id LIMIT ");
        builder.push_bind(i64::from(limit));

        let rows: Vec<MedicineRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Search returned medicines");
        Ok(rows
            .into_iter()
            .map(|row| MedicineDetail {
                medicine_id: row.medicine_id,
                record: row.into_record(),
            })
            .collect())
    }

    /// Gets a medicine with its ingredient list.
    ///
    /// ## Returns
    /// * `Ok(MedicineDetail)` - Medicine found
    /// * `Err(DbError::NotFound)` - No medicine with this ID
    pub async fn get_by_id(&self, id: i64) -> DbResult<MedicineDetail> {
        let mut query = QueryBuilder::<Sqlite>::new(RECORD_SELECT);
        query.push(" WHERE m.medicine_id = ");
        query.push_bind(id);

        let row: MedicineRow = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Medicine", id.to_string()))?;

        let ingredients: Vec<IngredientRow> = sqlx::query_as(
            r#"
            SELECT mi.medicine_id, i.name, mi.strength
            FROM medicine_ingredient mi
            JOIN ingredient i ON i.ingredient_id = mi.ingredient_id
            WHERE mi.medicine_id = ?1
            ORDER BY i.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let medicine_id = row.medicine_id;
        let mut record = row.into_record();
        record.ingredients = Some(
            ingredients
                .into_iter()
                .map(|i| Ingredient {
                    name: i.name,
                    strength: i.strength,
                })
                .collect(),
        );

        Ok(MedicineDetail {
            medicine_id,
            record,
        })
    }

    /// Distinct values for the filter dropdowns, each sorted.
    pub async fn filter_options(&self) -> DbResult<FilterOptions> {
        let manufacturers: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT name FROM manufacturer ORDER BY name COLLATE NOCASE",
        )
        .fetch_all(&self.pool)
        .await?;

        let categories: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT name FROM category ORDER BY name COLLATE NOCASE")
                .fetch_all(&self.pool)
                .await?;

        let dosage_forms: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT dosage_form FROM medicine \
             WHERE dosage_form IS NOT NULL AND dosage_form <> '' ORDER BY dosage_form",
        )
        .fetch_all(&self.pool)
        .await?;

        let classifications: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT classification FROM medicine \
             WHERE classification IS NOT NULL AND classification <> '' ORDER BY classification",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(FilterOptions {
            manufacturers,
            categories,
            dosage_forms,
            classifications,
        })
    }

    /// Counts rows in the medicine, manufacturer and category tables.
    pub async fn counts(&self) -> DbResult<TableCounts> {
        let medicines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medicine")
            .fetch_one(&self.pool)
            .await?;
        let manufacturers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM manufacturer")
            .fetch_one(&self.pool)
            .await?;
        let categories: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM category")
            .fetch_one(&self.pool)
            .await?;

        Ok(TableCounts {
            medicines,
            manufacturers,
            categories,
        })
    }

    // =========================================================================
    // Inserts
    // =========================================================================

    /// Inserts a medicine, creating its category, manufacturer and
    /// ingredients by name when they don't exist yet.
    ///
    /// ## Returns
    /// The new `medicine_id`.
    pub async fn insert(&self, record: &MedicineRecord) -> DbResult<i64> {
        debug!(name = %record.medicine_name, "Inserting medicine");

        let mut tx = self.pool.begin().await?;

        let category_id = match record.category.as_deref() {
            Some(name) => Some(upsert_named(&mut tx, "category", "category_id", name).await?),
            None => None,
        };
        let manufacturer_id = match record.manufacturer.as_deref() {
            Some(name) => {
                Some(upsert_named(&mut tx, "manufacturer", "manufacturer_id", name).await?)
            }
            None => None,
        };

        let medicine_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO medicine (
                name, category_id, manufacturer_id,
                dosage_form, strength, indication, classification
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING medicine_id
            "#,
        )
        .bind(&record.medicine_name)
        .bind(category_id)
        .bind(manufacturer_id)
        .bind(&record.dosage_form)
        .bind(&record.strength)
        .bind(&record.indication)
        .bind(&record.classification)
        .fetch_one(&mut *tx)
        .await?;

        for ingredient in record.ingredients.iter().flatten() {
            let ingredient_id =
                upsert_named(&mut tx, "ingredient", "ingredient_id", &ingredient.name).await?;
            sqlx::query(
                "INSERT INTO medicine_ingredient (medicine_id, ingredient_id, strength) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(medicine_id)
            .bind(ingredient_id)
            .bind(&ingredient.strength)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(medicine_id)
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Appends a `WHERE` clause for the recognized filter keys.
fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filters: &FilterSet) {
    let mut first = true;

    if let Some(category) = filters.category() {
        next_clause(query, &mut first);
        query.push("c.name LIKE ");
        query.push_bind(like_pattern(category));
        query.push(" ESCAPE '\\'");
    }
    if let Some(manufacturer) = filters.manufacturer() {
        next_clause(query, &mut first);
        query.push("ma.name LIKE ");
        query.push_bind(like_pattern(manufacturer));
        query.push(" ESCAPE '\\'");
    }
    if let Some(classification) = filters.classification() {
        next_clause(query, &mut first);
        query.push("m.classification = ");
        query.push_bind(classification.to_string());
    }
    if let Some(dosage_form) = filters.dosage_form() {
        next_clause(query, &mut first);
        query.push("m.dosage_form = ");
        query.push_bind(dosage_form.to_string());
    }
    if let Some(search) = filters.search() {
        let pattern = like_pattern(search);
        next_clause(query, &mut first);
        query.push("(m.name LIKE ");
        query.push_bind(pattern.clone());
        query.push(" ESCAPE '\\' OR m.indication LIKE ");
        query.push_bind(pattern);
        query.push(" ESCAPE '\\')");
    }
}

fn next_clause(query: &mut QueryBuilder<'_, Sqlite>, first: &mut bool) {
    query.push(if *first { " WHERE " } else { " AND " });
    *first = false;
}

/// `%value%` with LIKE wildcards in `value` escaped.
fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn group_ingredients(rows: Vec<IngredientRow>) -> HashMap<i64, Vec<Ingredient>> {
    let mut grouped: HashMap<i64, Vec<Ingredient>> = HashMap::new();
    for row in rows {
        grouped.entry(row.medicine_id).or_default().push(Ingredient {
            name: row.name,
            strength: row.strength,
        });
    }
    grouped
}

/// Returns the ID of the row named `name` in `table`, inserting it if needed.
///
/// `table` and `id_column` are compile-time constants, never client input.
async fn upsert_named(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    table: &'static str,
    id_column: &'static str,
    name: &str,
) -> DbResult<i64> {
    sqlx::query(&format!("INSERT OR IGNORE INTO {table} (name) VALUES (?1)"))
        .bind(name)
        .execute(&mut **tx)
        .await?;

    let id: i64 = sqlx::query_scalar(&format!("SELECT {id_column} FROM {table} WHERE name = ?1"))
        .bind(name)
        .fetch_one(&mut **tx)
        .await?;

    Ok(id)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medicines();

        let rows = vec![
            MedicineRecord::new("Tylenol")
                .category("Analgesic")
                .manufacturer("J&J")
                .classification("OTC")
                .dosage_form("Tablet"),
            MedicineRecord::new("Aspirin")
                .category("Analgesic")
                .manufacturer("Bayer")
                .classification("OTC")
                .dosage_form("Tablet")
                .ingredients(vec![Ingredient {
                    name: "Acetylsalicylic acid".to_string(),
                    strength: Some("500 mg".to_string()),
                }]),
            MedicineRecord::new("Advil")
                .manufacturer("Pfizer")
                .classification("OTC")
                .dosage_form("Capsule"),
            MedicineRecord::new("Amoxil")
                .category("Antibiotic")
                .manufacturer("GSK")
                .classification("Prescription")
                .dosage_form("Capsule"),
        ];
        for row in &rows {
            repo.insert(row).await.unwrap();
        }
        db
    }

    fn names(records: &[MedicineRecord]) -> Vec<&str> {
        records.iter().map(|r| r.medicine_name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_fetch_orders_by_name() {
        let db = seeded().await;
        let rows = db
            .medicines()
            .fetch_for_export(&FilterSet::new(), false)
            .await
            .unwrap();

        assert_eq!(names(&rows), vec!["Advil", "Amoxil", "Aspirin", "Tylenol"]);
        assert_eq!(rows[0].category, None);
        assert!(rows.iter().all(|r| r.ingredients.is_none()));
    }

    #[tokio::test]
    async fn test_name_order_ignores_case() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.medicines();
        for name in ["aspirin", "Zyrtec", "Bisoprolol", "Aspirin"] {
            repo.insert(&MedicineRecord::new(name)).await.unwrap();
        }

        let rows = repo.fetch_for_export(&FilterSet::new(), false).await.unwrap();
        assert_eq!(names(&rows), vec!["aspirin", "Aspirin", "Bisoprolol", "Zyrtec"]);

        let results = repo.search("", None, None, 3).await.unwrap();
        let found: Vec<&str> = results
            .iter()
            .map(|d| d.record.medicine_name.as_str())
            .collect();
        assert_eq!(found, vec!["aspirin", "Aspirin", "Bisoprolol"]);
    }

    #[tokio::test]
    async fn test_fetch_category_is_case_insensitive_substring() {
        let db = seeded().await;
        let filters = FilterSet::new().with("category", "ANALG");
        let rows = db.medicines().fetch_for_export(&filters, false).await.unwrap();

        assert_eq!(names(&rows), vec!["Aspirin", "Tylenol"]);
    }

    #[tokio::test]
    async fn test_fetch_classification_is_exact() {
        let db = seeded().await;
        let repo = db.medicines();

        let filters = FilterSet::new().with("classification", "Prescription");
        let rows = repo.fetch_for_export(&filters, false).await.unwrap();
        assert_eq!(names(&rows), vec!["Amoxil"]);

        let filters = FilterSet::new().with("classification", "Prescr");
        assert!(repo.fetch_for_export(&filters, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_combines_filters() {
        let db = seeded().await;
        let filters = FilterSet::new()
            .with("manufacturer", "a")
            .with("dosage_form", "Tablet");
        let rows = db.medicines().fetch_for_export(&filters, false).await.unwrap();

        assert_eq!(names(&rows), vec!["Aspirin"]);
    }

    #[tokio::test]
    async fn test_fetch_escapes_like_wildcards() {
        let db = seeded().await;
        let filters = FilterSet::new().with("manufacturer", "%");
        let rows = db.medicines().fetch_for_export(&filters, false).await.unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_with_ingredients() {
        let db = seeded().await;
        let rows = db
            .medicines()
            .fetch_for_export(&FilterSet::new(), true)
            .await
            .unwrap();

        let aspirin = rows.iter().find(|r| r.medicine_name == "Aspirin").unwrap();
        let ingredients = aspirin.ingredients.as_ref().unwrap();
        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].name, "Acetylsalicylic acid");

        let advil = rows.iter().find(|r| r.medicine_name == "Advil").unwrap();
        assert_eq!(advil.ingredients.as_deref(), Some(&[][..]));
    }

    #[tokio::test]
    async fn test_search_and_limit() {
        let db = seeded().await;
        let repo = db.medicines();

        let results = repo.search("", None, None, 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].record.medicine_name, "Advil");

        let results = repo.search("tyl", None, None, 50).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].record.manufacturer.as_deref(), Some("J&J"));

        let results = repo.search("", Some("bayer"), Some("analgesic"), 50).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = seeded().await;
        let repo = db.medicines();

        let hit = repo.search("aspirin", None, None, 1).await.unwrap();
        let detail = repo.get_by_id(hit[0].medicine_id).await.unwrap();
        assert_eq!(detail.record.medicine_name, "Aspirin");
        assert_eq!(detail.record.ingredients.as_ref().map(Vec::len), Some(1));

        let missing = repo.get_by_id(9999).await;
        assert!(matches!(missing, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_filter_options_and_counts() {
        let db = seeded().await;
        let repo = db.medicines();

        let options = repo.filter_options().await.unwrap();
        assert_eq!(options.categories, vec!["Analgesic", "Antibiotic"]);
        assert_eq!(options.manufacturers, vec!["Bayer", "GSK", "J&J", "Pfizer"]);
        assert_eq!(options.dosage_forms, vec!["Capsule", "Tablet"]);
        assert_eq!(options.classifications, vec!["OTC", "Prescription"]);

        let counts = repo.counts().await.unwrap();
        assert_eq!(
            counts,
            TableCounts {
                medicines: 4,
                manufacturers: 4,
                categories: 2,
            }
        );
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("abc"), "%abc%");
        assert_eq!(like_pattern("50%_x"), "%50\\%\\_x%");
    }
}
