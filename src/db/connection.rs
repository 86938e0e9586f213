// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - Connections are checked out per query and returned on drop
// - Clear error propagation

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use super::config::{DatabaseConfig, DatabaseType};
use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Create a connection pool for the configured database
///
/// Every connection gets:
/// - Foreign keys enabled
/// - WAL journal
/// - Busy timeout from config
///
/// Only SQLite is linked into this build; other engines are rejected.
pub fn create_connection_pool(config: &DatabaseConfig) -> AppResult<ConnectionPool> {
    if config.database_type != DatabaseType::Sqlite {
        return Err(AppError::Config(format!(
            "no driver available for database type '{}'",
            config.database_type
        )));
    }

    if config.max_connections == 0 {
        return Err(AppError::Config("max_connections must be at least 1".to_string()));
    }

    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let busy_timeout_ms = config.busy_timeout_ms;
    let manager = SqliteConnectionManager::file(&config.path).with_init(move |conn| {
        conn.execute_batch(&format!(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = {};",
            busy_timeout_ms
        ))
    });

    let pool = Pool::builder()
        .max_size(config.max_connections)
        .build(manager)
        .map_err(|e| AppError::Config(format!("Failed to create connection pool: {}", e)))?;

    log::debug!(
        "opened connection pool at {} (max {} connections)",
        config.path.display(),
        config.max_connections
    );

    Ok(pool)
}

/// Get a connection from the pool
pub fn get_connection(pool: &ConnectionPool) -> AppResult<PooledConn> {
    Ok(pool.get()?)
}

/// Create a standalone in-memory connection (for testing)
pub fn create_test_connection() -> AppResult<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}
