//! Catalog configuration.
//!
//! # Responsibility
//! - Describe which storage backend backs the catalog and where logs go.
//! - Load that description from JSON or from process environment.
//!
//! # Invariants
//! - A missing storage section selects the transient in-memory backend.
//! - A missing logging section leaves file logging disabled.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_ENV: &str = "RENTAL_CATALOG_STORAGE";
pub const LOG_LEVEL_ENV: &str = "RENTAL_CATALOG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "RENTAL_CATALOG_LOG_DIR";

/// Storage backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Transient process-local maps; no storage-level unique constraints.
    #[default]
    Memory,
    /// SQLite schema and constraints on a private in-memory database.
    SqliteMemory,
    /// SQLite database file, created and migrated on open.
    Sqlite { path: PathBuf },
}

impl StorageConfig {
    /// Short backend label used in log events.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::SqliteMemory => "sqlite_memory",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
    #[serde(default)]
    pub duplicate_to_stderr: bool,
}

fn default_level() -> String {
    default_log_level().to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    InvalidStorage(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid catalog config: {err}"),
            Self::InvalidStorage(value) => write!(
                f,
                "unsupported storage `{value}`; expected memory|sqlite-memory|sqlite:<path>"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidStorage(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl CatalogConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads `RENTAL_CATALOG_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let storage = match read(STORAGE_ENV) {
            Some(value) => parse_storage_value(&value)?,
            None => StorageConfig::default(),
        };
        let logging = read(LOG_DIR_ENV).map(|log_dir| LoggingConfig {
            level: read(LOG_LEVEL_ENV).unwrap_or_else(default_level),
            log_dir: PathBuf::from(log_dir),
            duplicate_to_stderr: false,
        });

        Ok(Self { storage, logging })
    }
}

/// Parses `memory`, `sqlite-memory` or `sqlite:<path>`.
pub fn parse_storage_value(value: &str) -> Result<StorageConfig, ConfigError> {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "memory" | "in-memory" => return Ok(StorageConfig::Memory),
        "sqlite-memory" | "sqlite_memory" | "sqlite::memory:" => {
            return Ok(StorageConfig::SqliteMemory)
        }
        _ => {}
    }

    match trimmed.split_once(':') {
        Some((scheme, path))
            if scheme.eq_ignore_ascii_case("sqlite") && !path.trim().is_empty() =>
        {
            Ok(StorageConfig::Sqlite {
                path: PathBuf::from(path.trim()),
            })
        }
        _ => Err(ConfigError::InvalidStorage(trimmed.to_string())),
    }
}
