// src/lib.rs
// Series lookup - resolves titles, slugs, external IDs and paths to catalog series
//
// Architecture:
// - Domain: the series entity and the resolution outcome
// - Storage: pooled SQLite access behind the SeriesStore trait
// - Lookup: matching and ambiguity policy on top of the store
// - Explicit: ambiguous matches are values, never a silent pick

pub mod db;
pub mod domain;
pub mod error;
pub mod repositories;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{validate_series, DomainError, SeriesMatch, SeriesRecord};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{
    create_connection_pool, initialize_database, ConnectionPool, DatabaseConfig, DatabaseType,
    DialectInfo, SqlDialect,
};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    SeriesLookup, SeriesLookupIndex, SeriesStore, SqlValue, SqliteSeriesStore, WhereClause,
};
