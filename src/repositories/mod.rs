// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - series_store is a DUMB data mapper: explicit SQL, no lookup policy
// - series_lookup owns the matching policy and never writes
// - Every call checks out its own pooled connection

pub mod series_lookup;
pub mod series_store;

pub use series_lookup::{SeriesLookup, SeriesLookupIndex};
pub use series_store::{SeriesStore, SqlValue, SqliteSeriesStore, WhereClause};
