// src/repositories/series_store.rs
//
// Series persistence
//
// Generic row-level access to the `series` table: primary-key CRUD plus
// "give me every row matching this WHERE clause". Lookup policy lives in
// series_lookup.rs, not here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::types::{ToSqlOutput, Type};
use rusqlite::{params, params_from_iter, Row, ToSql};

use crate::db::{ConnectionPool, DatabaseType, DialectInfo};
use crate::domain::{validate_series, SeriesRecord};
use crate::error::{AppError, AppResult};

const SELECT_SERIES: &str =
    "SELECT id, external_id, title, clean_title, title_slug, year, path, tags, added FROM series";

/// A value bound to a WHERE clause parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Text(value) => value.to_sql(),
            SqlValue::Integer(value) => value.to_sql(),
        }
    }
}

/// WHERE clause body with positional parameters
///
/// Placeholders in `sql` must already be in the store's dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

impl WhereClause {
    pub fn new(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Matches every row
    pub fn all() -> Self {
        Self::new("1 = 1", Vec::new())
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait SeriesStore: Send + Sync {
    /// Rows matching `clause`, in storage (id) order
    fn query_where(&self, clause: &WhereClause) -> AppResult<Vec<SeriesRecord>>;

    /// Insert a new series and return it with its assigned id
    fn insert(&self, series: &SeriesRecord) -> AppResult<SeriesRecord>;

    fn update(&self, series: &SeriesRecord) -> AppResult<()>;

    fn delete(&self, id: i64) -> AppResult<()>;

    fn get_by_id(&self, id: i64) -> AppResult<Option<SeriesRecord>>;

    fn all(&self) -> AppResult<Vec<SeriesRecord>>;
}

pub struct SqliteSeriesStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteSeriesStore {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to SeriesRecord - returns rusqlite::Error for query_map compatibility
    fn row_to_series(row: &Row) -> Result<SeriesRecord, rusqlite::Error> {
        let tags_json: Option<String> = row.get(7)?;
        let tags = tags_json
            .map(|json| {
                serde_json::from_str::<Vec<i32>>(&json)
                    .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))
            })
            .transpose()?;

        let added_str: String = row.get(8)?;
        let added = DateTime::parse_from_rfc3339(&added_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

        Ok(SeriesRecord {
            id: row.get(0)?,
            external_id: row.get(1)?,
            title: row.get(2)?,
            clean_title: row.get(3)?,
            title_slug: row.get(4)?,
            year: row.get(5)?,
            path: row.get(6)?,
            tags,
            added,
        })
    }

    fn tags_to_json(series: &SeriesRecord) -> AppResult<Option<String>> {
        Ok(series
            .tags
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?)
    }
}

impl DialectInfo for SqliteSeriesStore {
    fn current_dialect(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }
}

impl SeriesStore for SqliteSeriesStore {
    fn query_where(&self, clause: &WhereClause) -> AppResult<Vec<SeriesRecord>> {
        let conn = self.pool.get()?;

        let sql = format!("{} WHERE {} ORDER BY id", SELECT_SERIES, clause.sql);
        log::debug!("series query: {}", sql);

        let mut stmt = conn.prepare(&sql)?;
        let series: Vec<SeriesRecord> = stmt
            .query_map(params_from_iter(clause.params.iter()), Self::row_to_series)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(series)
    }

    fn insert(&self, series: &SeriesRecord) -> AppResult<SeriesRecord> {
        validate_series(series)?;

        let conn = self.pool.get()?;
        let tags_json = Self::tags_to_json(series)?;

        conn.execute(
            "INSERT INTO series (external_id, title, clean_title, title_slug, year, path, tags, added)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                series.external_id,
                series.title,
                series.clean_title,
                series.title_slug,
                series.year,
                series.path,
                tags_json,
                series.added.to_rfc3339(),
            ],
        )?;

        let mut saved = series.clone();
        saved.id = conn.last_insert_rowid();

        Ok(saved)
    }

    fn update(&self, series: &SeriesRecord) -> AppResult<()> {
        validate_series(series)?;

        let conn = self.pool.get()?;
        let tags_json = Self::tags_to_json(series)?;

        let rows_affected = conn.execute(
            "UPDATE series
             SET external_id = ?2, title = ?3, clean_title = ?4, title_slug = ?5,
                 year = ?6, path = ?7, tags = ?8, added = ?9
             WHERE id = ?1",
            params![
                series.id,
                series.external_id,
                series.title,
                series.clean_title,
                series.title_slug,
                series.year,
                series.path,
                tags_json,
                series.added.to_rfc3339(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM series WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<SeriesRecord>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_SERIES))?;

        match stmt.query_row(params![id], Self::row_to_series) {
            Ok(series) => Ok(Some(series)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn all(&self) -> AppResult<Vec<SeriesRecord>> {
        self.query_where(&WhereClause::all())
    }
}
