// src/db/mod.rs
//
// Database module
//
// Provides:
// - Configuration
// - Connection pooling
// - Schema migrations
// - SQL dialect variants

pub mod config;
pub mod connection;
pub mod dialect;
pub mod migrations;

pub use config::{default_database_path, DatabaseConfig, DatabaseType};

pub use connection::{create_connection_pool, get_connection, ConnectionPool, PooledConn};

pub use dialect::{dialect_for, DialectInfo, PostgresDialect, SqlDialect, SqliteDialect};

pub use migrations::{initialize_database, verify_database_integrity};
