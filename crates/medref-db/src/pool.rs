//! # Database Handle
//!
//! Opens the SQLite file behind the reference service and hands out
//! repositories.
//!
//! ```text
//! ApiConfig ──► DbConfig::new(path).max_connections(n)
//!                    │
//!                    ▼
//!             Database::new ── open (WAL) ── apply migrations
//!                    │
//!      ┌─────────────┼──────────────┐
//!      ▼             ▼              ▼
//!   export        browse         /health
//!  fetch rows   search/detail   table_counts
//! ```
//!
//! The service only reads during normal operation; inserts come from the
//! seed binary and tests. WAL lets those writes proceed while exports hold
//! their read transactions.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::medicine::{MedicineRepository, TableCounts};

/// How long a handler waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the database lives and how many connections may read it at once.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl DbConfig {
    /// File-backed database at `path`, created on first open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Private in-memory database for tests.
    ///
    /// Every SQLite connection to `:memory:` sees its own empty database,
    /// so the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
        }
    }
}

/// Shared handle to the medicine database. Clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool and brings the schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening medicine database");

        let url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        migrations::run_migrations(&pool).await?;

        info!(max_connections = config.max_connections, "Medicine database ready");
        Ok(Database { pool })
    }

    pub fn medicines(&self) -> MedicineRepository {
        MedicineRepository::new(self.pool.clone())
    }

    /// Row counts of the main tables.
    ///
    /// The health endpoint uses this as its connectivity check: any error
    /// here means the database is unreachable or the schema is missing.
    pub async fn table_counts(&self) -> DbResult<TableCounts> {
        self.medicines().counts().await
    }

    /// Waits for in-flight queries, then closes every connection.
    pub async fn close(&self) {
        info!("Closing medicine database");
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database_starts_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let counts = db.table_counts().await.unwrap();
        assert_eq!(counts.medicines, 0);
        assert_eq!(counts.categories, 0);
    }

    #[tokio::test]
    async fn test_closed_database_reports_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(matches!(
            db.table_counts().await,
            Err(DbError::ConnectionFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let path = std::env::temp_dir().join(format!("medref-pool-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path).max_connections(2)).await.unwrap();
        db.medicines()
            .insert(&medref_core::MedicineRecord::new("Aspirin"))
            .await
            .unwrap();
        db.close().await;

        // Reopening re-runs the migrator against an already current schema
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.table_counts().await.unwrap().medicines, 1);
        db.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}
