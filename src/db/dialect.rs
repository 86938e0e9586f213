// src/db/dialect.rs
//
// SQL dialect variants
//
// Engines disagree on substring search and bind-parameter syntax. Each
// engine gets one implementation; callers pick it once and keep it.

use super::config::{DatabaseConfig, DatabaseType};

/// Reports which engine the active connection speaks
pub trait DialectInfo {
    fn current_dialect(&self) -> DatabaseType;
}

impl DialectInfo for DatabaseConfig {
    fn current_dialect(&self) -> DatabaseType {
        self.database_type
    }
}

/// Engine-specific SQL fragments
pub trait SqlDialect: Send + Sync {
    fn database_type(&self) -> DatabaseType;

    /// Bind parameter for 1-based position `index`
    fn placeholder(&self, index: usize) -> String;

    /// Predicate that holds when the value of `needle_column` occurs inside
    /// `haystack` (a bound parameter or literal)
    fn containment_predicate(&self, needle_column: &str, haystack: &str) -> String;
}

pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    fn placeholder(&self, index: usize) -> String {
        format!("?{}", index)
    }

    fn containment_predicate(&self, needle_column: &str, haystack: &str) -> String {
        format!("instr({}, {}) > 0", haystack, needle_column)
    }
}

pub struct PostgresDialect;

impl SqlDialect for PostgresDialect {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn containment_predicate(&self, needle_column: &str, haystack: &str) -> String {
        format!("(strpos({}, {}) > 0)", haystack, needle_column)
    }
}

pub fn dialect_for(database_type: DatabaseType) -> Box<dyn SqlDialect> {
    match database_type {
        DatabaseType::Sqlite => Box::new(SqliteDialect),
        DatabaseType::Postgres => Box::new(PostgresDialect),
    }
}
