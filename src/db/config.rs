// src/db/config.rs
//
// Database configuration
//
// Every field has a default, so an empty document `{}` is a valid config.

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::AppResult;

/// Which SQL engine the connection speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseType {
    Sqlite,
    Postgres,
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseType::Sqlite => write!(f, "sqlite"),
            DatabaseType::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database file location
    pub path: PathBuf,

    pub database_type: DatabaseType,

    /// Upper bound on pooled connections
    pub max_connections: u32,

    /// How long SQLite waits on a locked database before failing
    pub busy_timeout_ms: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            database_type: DatabaseType::Sqlite,
            max_connections: 15,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Config pointing at a specific database file, defaults elsewhere
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Default database location
///
/// Path structure: {APP_DATA}/series-lookup/series.db
/// Falls back to the working directory when no data dir is known.
pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("series-lookup")
        .join("series.db")
}
