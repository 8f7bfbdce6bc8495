//! # Database Error Types
//!
//! ```text
//! sqlx::Error / MigrateError ──► DbError ──► ApiError (apps/api)
//!                                  │
//!                                  ├── NotFound        → 404
//!                                  └── everything else → 500, details logged
//! ```

use thiserror::Error;

/// Failures of the medicine database.
#[derive(Debug, Error)]
pub enum DbError {
    /// A lookup by ID matched nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The database could not be opened, or the pool was already closed.
    ///
    /// ## When This Occurs
    /// - The file cannot be created (missing directory, permissions)
    /// - A request arrives after shutdown closed the pool
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The embedded schema could not be applied.
    ///
    /// ## When This Occurs
    /// - A migration file was edited after it was applied
    /// - The file holds a newer schema than this binary knows
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Every connection stayed busy for the whole acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// SQLite rejected or failed a statement.
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::QueryFailed(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
