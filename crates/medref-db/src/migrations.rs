//! # Schema Migrations
//!
//! SQL files under `migrations/sqlite/` are compiled into the binary and
//! applied every time [`crate::Database::new`] opens a pool.
//!
//! ```text
//! migrations/sqlite/
//! ├── 001_initial_schema.sql      medicine, category, manufacturer,
//! │                               ingredient, medicine_ingredient
//! └── 002_medicine_name_nocase.sql  index behind name-ordered reads
//! ```
//!
//! Applied versions are tracked in `_sqlx_migrations`, so reopening an
//! up-to-date database is a no-op. Schema changes go in a new numbered
//! file; an edited file fails its checksum on the next start.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies every migration the database has not seen yet.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;
    info!(embedded = MIGRATOR.migrations.len(), "Schema up to date");
    Ok(())
}
