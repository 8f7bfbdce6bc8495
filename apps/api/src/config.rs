//! API configuration module.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! ```text
//! built-in defaults ─► medref.toml (optional) ─► MEDREF_* environment
//! ```
//!
//! ## Environment Variables
//! - `MEDREF_BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `MEDREF_PORT` - Listen port (default: 8000)
//! - `MEDREF_DATABASE_PATH` - SQLite file (default: ./medref.db)
//! - `MEDREF_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `MEDREF_CORS_PERMISSIVE` - Allow any origin (default: true)
//! - `MEDREF_MAX_BODY_BYTES` - Request body cap, chart images included (default: 32 MiB)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use medref_db::DbConfig;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "medref.toml";

/// API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub bind_addr: String,

    /// Listen port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// Attach a permissive CORS layer for the browser frontend
    pub cors_permissive: bool,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: "0.0.0.0".to_string(),
            port: 8000,
            database_path: PathBuf::from("./medref.db"),
            max_connections: 5,
            cors_permissive: true,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

impl ApiConfig {
    /// Load configuration from [`CONFIG_FILE`] and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path` (if it exists) and the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let defaults = ApiConfig::default();

        let settings = config::Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("port", i64::from(defaults.port))?
            .set_default(
                "database_path",
                defaults.database_path.to_string_lossy().into_owned(),
            )?
            .set_default("max_connections", i64::from(defaults.max_connections))?
            .set_default("cors_permissive", defaults.cors_permissive)?
            .set_default("max_body_bytes", defaults.max_body_bytes as i64)?
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("MEDREF").try_parsing(true))
            .build()?;

        let config: ApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue("max_body_bytes".to_string()));
        }

        Ok(())
    }

    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("bind_addr".to_string()))
    }

    /// Pool configuration for [`medref_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
