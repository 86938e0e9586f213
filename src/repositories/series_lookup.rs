// src/repositories/series_lookup.rs
//
// Series lookup index
//
// Resolves titles, slugs, external IDs and paths to series.
//
// Policy per lookup:
// - Clean title, clean title + year, slug: at most one result, ambiguity is reported
// - External ID, path: first match wins, duplicates are only logged
// - Title containment: every match

use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{dialect_for, DialectInfo, SqlDialect};
use crate::domain::{SeriesMatch, SeriesRecord};
use crate::error::AppResult;
use crate::repositories::series_store::{SeriesStore, SqlValue, WhereClause};

pub trait SeriesLookup: Send + Sync {
    /// True if any series lives at exactly `path` (case-sensitive)
    fn exists_by_path(&self, path: &str) -> AppResult<bool>;

    /// Lower-cases `clean_title` before comparing
    fn find_by_clean_title(&self, clean_title: &str) -> AppResult<SeriesMatch>;

    fn find_by_clean_title_and_year(&self, clean_title: &str, year: i32) -> AppResult<SeriesMatch>;

    /// Lower-cases `slug` before comparing
    fn find_by_title_slug(&self, slug: &str) -> AppResult<SeriesMatch>;

    fn find_by_external_id(&self, external_id: i32) -> AppResult<Option<SeriesRecord>>;

    fn find_by_path(&self, path: &str) -> AppResult<Option<SeriesRecord>>;

    /// Every series whose clean title occurs somewhere inside `haystack`
    fn find_by_title_contains(&self, haystack: &str) -> AppResult<Vec<SeriesRecord>>;

    fn all_external_ids(&self) -> AppResult<Vec<i32>>;

    fn all_paths(&self) -> AppResult<HashMap<i64, String>>;

    /// Only series with tags; untagged series are left out entirely
    fn all_tags(&self) -> AppResult<HashMap<i64, Vec<i32>>>;
}

pub struct SeriesLookupIndex {
    store: Arc<dyn SeriesStore>,
    dialect: Box<dyn SqlDialect>,
}

impl SeriesLookupIndex {
    /// The dialect is read once here and kept for the index's lifetime
    pub fn new(store: Arc<dyn SeriesStore>, dialect_info: &dyn DialectInfo) -> Self {
        Self::with_dialect(store, dialect_for(dialect_info.current_dialect()))
    }

    pub fn with_dialect(store: Arc<dyn SeriesStore>, dialect: Box<dyn SqlDialect>) -> Self {
        Self { store, dialect }
    }

    /// `column = <param>` over a single value
    fn equals(&self, column: &str, value: impl Into<SqlValue>) -> WhereClause {
        WhereClause::new(
            format!("{} = {}", column, self.dialect.placeholder(1)),
            vec![value.into()],
        )
    }

    fn query(&self, clause: &WhereClause) -> AppResult<Vec<SeriesRecord>> {
        self.store.query_where(clause)
    }

    fn single_or_ambiguous(&self, what: &str, candidates: Vec<SeriesRecord>) -> SeriesMatch {
        let outcome = SeriesMatch::from_candidates(candidates);
        if let SeriesMatch::Ambiguous(all) = &outcome {
            log::warn!("{} matched {} series", what, all.len());
        }
        outcome
    }

    fn first_of(&self, what: &str, candidates: Vec<SeriesRecord>) -> Option<SeriesRecord> {
        if candidates.len() > 1 {
            log::warn!(
                "{} is shared by {} series, using id {}",
                what,
                candidates.len(),
                candidates[0].id
            );
        }
        candidates.into_iter().next()
    }
}

impl SeriesLookup for SeriesLookupIndex {
    fn exists_by_path(&self, path: &str) -> AppResult<bool> {
        Ok(!self.query(&self.equals("path", path))?.is_empty())
    }

    fn find_by_clean_title(&self, clean_title: &str) -> AppResult<SeriesMatch> {
        let clean_title = clean_title.to_lowercase();
        log::debug!("looking up series by clean title '{}'", clean_title);

        let candidates = self.query(&self.equals("clean_title", clean_title.as_str()))?;
        Ok(self.single_or_ambiguous(&format!("clean title '{}'", clean_title), candidates))
    }

    fn find_by_clean_title_and_year(&self, clean_title: &str, year: i32) -> AppResult<SeriesMatch> {
        let clean_title = clean_title.to_lowercase();
        log::debug!("looking up series by clean title '{}' ({})", clean_title, year);

        let clause = WhereClause::new(
            format!(
                "clean_title = {} AND year = {}",
                self.dialect.placeholder(1),
                self.dialect.placeholder(2)
            ),
            vec![SqlValue::from(clean_title.as_str()), SqlValue::from(year)],
        );

        let candidates = self.query(&clause)?;
        Ok(self.single_or_ambiguous(&format!("clean title '{}' ({})", clean_title, year), candidates))
    }

    fn find_by_title_slug(&self, slug: &str) -> AppResult<SeriesMatch> {
        let slug = slug.to_lowercase();
        log::debug!("looking up series by slug '{}'", slug);

        let candidates = self.query(&self.equals("title_slug", slug.as_str()))?;
        Ok(self.single_or_ambiguous(&format!("slug '{}'", slug), candidates))
    }

    fn find_by_external_id(&self, external_id: i32) -> AppResult<Option<SeriesRecord>> {
        log::debug!("looking up series by external id {}", external_id);

        let candidates = self.query(&self.equals("external_id", external_id))?;
        Ok(self.first_of(&format!("external id {}", external_id), candidates))
    }

    fn find_by_path(&self, path: &str) -> AppResult<Option<SeriesRecord>> {
        log::debug!("looking up series by path '{}'", path);

        let candidates = self.query(&self.equals("path", path))?;
        Ok(self.first_of(&format!("path '{}'", path), candidates))
    }

    fn find_by_title_contains(&self, haystack: &str) -> AppResult<Vec<SeriesRecord>> {
        // Clean titles are stored lower case
        let haystack = haystack.to_lowercase();
        log::debug!("looking up series contained in '{}'", haystack);

        let clause = WhereClause::new(
            self.dialect
                .containment_predicate("clean_title", &self.dialect.placeholder(1)),
            vec![SqlValue::from(haystack)],
        );

        self.query(&clause)
    }

    fn all_external_ids(&self) -> AppResult<Vec<i32>> {
        Ok(self
            .query(&WhereClause::all())?
            .into_iter()
            .map(|s| s.external_id)
            .collect())
    }

    fn all_paths(&self) -> AppResult<HashMap<i64, String>> {
        Ok(self
            .query(&WhereClause::all())?
            .into_iter()
            .map(|s| (s.id, s.path))
            .collect())
    }

    fn all_tags(&self) -> AppResult<HashMap<i64, Vec<i32>>> {
        let tagged = self.query(&WhereClause::new("tags IS NOT NULL", Vec::new()))?;

        Ok(tagged
            .into_iter()
            .filter_map(|s| s.tags.map(|tags| (s.id, tags)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, initialize_database, DatabaseConfig, DatabaseType, PostgresDialect};
    use crate::error::AppError;
    use crate::repositories::series_store::{MockSeriesStore, SqliteSeriesStore};
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: Arc<SqliteSeriesStore>,
        index: SeriesLookupIndex,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = DatabaseConfig::at(dir.path().join("series.db"));
            let pool = Arc::new(create_connection_pool(&config).unwrap());
            initialize_database(&pool.get().unwrap()).unwrap();

            let store = Arc::new(SqliteSeriesStore::new(pool));
            let index = SeriesLookupIndex::new(store.clone(), &config);

            Self { _dir: dir, store, index }
        }

        fn add(&self, external_id: i32, clean_title: &str, year: i32) -> SeriesRecord {
            self.add_series(SeriesRecord::new(
                external_id,
                format!("Series {}", external_id),
                clean_title,
                clean_title,
                year,
                format!("/tv/{}", external_id),
            ))
        }

        fn add_series(&self, series: SeriesRecord) -> SeriesRecord {
            self.store.insert(&series).unwrap()
        }
    }

    fn ids(series: &[SeriesRecord]) -> Vec<i64> {
        let mut ids: Vec<i64> = series.iter().map(|s| s.id).collect();
        ids.sort();
        ids
    }

    // ------------------------------------------------------------------
    // Exact title lookups
    // ------------------------------------------------------------------

    #[test]
    fn test_find_by_clean_title_ignores_input_case() {
        let fx = Fixture::new();
        let x = fx.add(1, "x", 2010);

        for input in ["x", "X"] {
            let found = fx.index.find_by_clean_title(input).unwrap();
            assert!(found.is_found());
            assert_eq!(found.record().map(|s| s.id), Some(x.id));
        }
    }

    #[test]
    fn test_find_by_clean_title_not_found() {
        let fx = Fixture::new();
        fx.add(1, "x", 2010);

        assert!(fx.index.find_by_clean_title("y").unwrap().is_not_found());
    }

    #[test]
    fn test_find_by_clean_title_reports_ambiguity() {
        let fx = Fixture::new();
        let a = fx.add(1, "x", 2010);
        let b = fx.add(2, "x", 2011);
        fx.add(3, "other", 2010);

        let found = fx.index.find_by_clean_title("x").unwrap();
        assert!(found.is_ambiguous());
        assert_eq!(ids(found.candidates()), vec![a.id, b.id]);

        let err = found.into_single().unwrap_err();
        assert_eq!(err.ambiguous_candidates().len(), 2);
        assert_eq!(
            err.to_string(),
            "Expected one series, but found 2. Matching series: [1][Series 1], [2][Series 2]"
        );
    }

    #[test]
    fn test_find_by_clean_title_and_year_narrows() {
        let fx = Fixture::new();
        let y2010 = fx.add(1, "x", 2010);
        fx.add(2, "x", 2011);

        let found = fx.index.find_by_clean_title_and_year("x", 2010).unwrap();
        assert_eq!(found.record().map(|s| s.id), Some(y2010.id));
    }

    #[test]
    fn test_find_by_clean_title_and_year_can_still_be_ambiguous() {
        let fx = Fixture::new();
        fx.add(1, "x", 2010);
        fx.add(2, "x", 2010);

        let found = fx.index.find_by_clean_title_and_year("X", 2010).unwrap();
        assert_eq!(found.candidates().len(), 2);
    }

    #[test]
    fn test_remake_scenario() {
        let fx = Fixture::new();
        let first = fx.add(1, "show", 2000);
        fx.add(2, "show", 2005);

        match fx.index.find_by_clean_title("show").unwrap().into_single() {
            Err(AppError::AmbiguousMatch(all)) => assert_eq!(all.len(), 2),
            other => panic!("expected ambiguous match, got {:?}", other),
        }

        let by_year = fx.index.find_by_clean_title_and_year("show", 2000).unwrap();
        assert_eq!(by_year.record().map(|s| s.id), Some(first.id));

        assert!(fx.index.find_by_clean_title_and_year("show", 1999).unwrap().is_not_found());
    }

    #[test]
    fn test_find_by_title_slug() {
        let fx = Fixture::new();
        let office = fx.add_series(SeriesRecord::new(1, "The Office", "theoffice", "the-office", 2005, "/tv/The Office"));

        let found = fx.index.find_by_title_slug("The-Office").unwrap();
        assert_eq!(found.record().map(|s| s.id), Some(office.id));

        assert!(fx.index.find_by_title_slug("the-office-uk").unwrap().is_not_found());

        fx.add_series(SeriesRecord::new(2, "The Office", "theoffice", "the-office", 2001, "/tv/The Office 2"));
        assert!(fx.index.find_by_title_slug("the-office").unwrap().is_ambiguous());
    }

    // ------------------------------------------------------------------
    // Lenient lookups
    // ------------------------------------------------------------------

    #[test]
    fn test_find_by_external_id() {
        let fx = Fixture::new();
        let lost = fx.add(73739, "lost", 2004);

        assert_eq!(fx.index.find_by_external_id(73739).unwrap().map(|s| s.id), Some(lost.id));
        assert!(fx.index.find_by_external_id(1).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_external_id_returns_one_without_failing() {
        let fx = Fixture::new();
        let a = fx.add(5, "a", 2000);
        let b = fx.add(5, "b", 2001);

        let found = fx.index.find_by_external_id(5).unwrap().unwrap();
        assert!(found.id == a.id || found.id == b.id);
    }

    #[test]
    fn test_exists_and_find_by_path_are_exact() {
        let fx = Fixture::new();
        let series = fx.add_series(SeriesRecord::new(1, "Lost", "lost", "lost", 2004, "/tv/Lost"));

        assert!(fx.index.exists_by_path("/tv/Lost").unwrap());
        assert!(!fx.index.exists_by_path("/tv/lost").unwrap());
        assert!(!fx.index.exists_by_path("/tv/Lost/").unwrap());

        assert_eq!(fx.index.find_by_path("/tv/Lost").unwrap().map(|s| s.id), Some(series.id));
        assert!(fx.index.find_by_path("/TV/LOST").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_path_returns_first() {
        let fx = Fixture::new();
        let first = fx.add_series(SeriesRecord::new(1, "A", "a", "a", 2000, "/tv/shared"));
        fx.add_series(SeriesRecord::new(2, "B", "b", "b", 2000, "/tv/shared"));

        assert_eq!(fx.index.find_by_path("/tv/shared").unwrap().map(|s| s.id), Some(first.id));
    }

    // ------------------------------------------------------------------
    // Containment
    // ------------------------------------------------------------------

    #[test]
    fn test_find_by_title_contains_release_name() {
        let fx = Fixture::new();
        let office = fx.add(1, "office", 2005);
        fx.add(2, "theofficeuk", 2001);
        let the = fx.add(3, "the", 1999);

        let found = fx.index.find_by_title_contains("The.Office.2005").unwrap();
        assert_eq!(ids(&found), vec![office.id, the.id]);
    }

    #[test]
    fn test_find_by_title_contains_direction() {
        let fx = Fixture::new();
        fx.add(1, "theofficeus", 2005);

        // Stored value must be inside the argument, not the other way round
        assert!(fx.index.find_by_title_contains("office").unwrap().is_empty());
        assert_eq!(fx.index.find_by_title_contains("theofficeus2005").unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_title_contains_empty_store() {
        let fx = Fixture::new();
        assert!(fx.index.find_by_title_contains("anything").unwrap().is_empty());
    }

    // ------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------

    #[test]
    fn test_all_external_ids_keeps_duplicates() {
        let fx = Fixture::new();
        fx.add(7, "a", 2000);
        fx.add(7, "b", 2000);
        fx.add(9, "c", 2000);

        let mut all = fx.index.all_external_ids().unwrap();
        all.sort();
        assert_eq!(all, vec![7, 7, 9]);
    }

    #[test]
    fn test_all_paths_one_entry_per_series() {
        let fx = Fixture::new();
        let a = fx.add_series(SeriesRecord::new(1, "A", "a", "a", 2000, "/tv/shared"));
        let b = fx.add_series(SeriesRecord::new(2, "B", "b", "b", 2000, "/tv/shared"));
        let c = fx.add_series(SeriesRecord::new(3, "C", "c", "c", 2000, "/tv/C"));

        let paths = fx.index.all_paths().unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[&a.id], "/tv/shared");
        assert_eq!(paths[&b.id], "/tv/shared");
        assert_eq!(paths[&c.id], "/tv/C");
    }

    #[test]
    fn test_all_tags_skips_untagged_keeps_empty() {
        let fx = Fixture::new();
        let tagged = fx.add_series(SeriesRecord::new(1, "A", "a", "a", 2000, "/tv/A").with_tags(vec![1, 2]));
        let empty = fx.add_series(SeriesRecord::new(2, "B", "b", "b", 2000, "/tv/B").with_tags(vec![]));
        let untagged = fx.add(3, "c", 2000);

        let tags = fx.index.all_tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[&tagged.id], vec![1, 2]);
        assert_eq!(tags[&empty.id], Vec::<i32>::new());
        assert!(!tags.contains_key(&untagged.id));
    }

    // ------------------------------------------------------------------
    // Dialect selection and collaborator failures
    // ------------------------------------------------------------------

    #[test]
    fn test_postgres_containment_clause() {
        let mut store = MockSeriesStore::new();
        store
            .expect_query_where()
            .withf(|clause| {
                clause.sql == "(strpos($1, clean_title) > 0)"
                    && clause.params == vec![SqlValue::from("the.office.2005")]
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let index = SeriesLookupIndex::with_dialect(Arc::new(store), Box::new(PostgresDialect));
        assert!(index.find_by_title_contains("The.Office.2005").unwrap().is_empty());
    }

    #[test]
    fn test_dialect_chosen_from_config() {
        let mut config = DatabaseConfig::at("/unused/series.db");
        config.database_type = DatabaseType::Postgres;

        let mut store = MockSeriesStore::new();
        store
            .expect_query_where()
            .withf(|clause| clause.sql == "clean_title = $1 AND year = $2")
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let index = SeriesLookupIndex::new(Arc::new(store), &config);
        assert!(index.find_by_clean_title_and_year("x", 2010).unwrap().is_not_found());
    }

    #[test]
    fn test_lookup_lowercases_before_querying() {
        let mut store = MockSeriesStore::new();
        store
            .expect_query_where()
            .withf(|clause| clause.sql == "title_slug = ?1" && clause.params == vec![SqlValue::from("breaking-bad")])
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let index = SeriesLookupIndex::new(Arc::new(store), &DatabaseConfig::at("/unused/series.db"));
        assert!(index.find_by_title_slug("Breaking-Bad").unwrap().is_not_found());
    }

    #[test]
    fn test_storage_failure_propagates() {
        let mut store = MockSeriesStore::new();
        store
            .expect_query_where()
            .returning(|_| Err(AppError::Pool("connection refused".to_string())));

        let index = SeriesLookupIndex::with_dialect(Arc::new(store), dialect_for(DatabaseType::Sqlite));

        assert!(matches!(index.find_by_clean_title("x"), Err(AppError::Pool(_))));
        assert!(matches!(index.exists_by_path("/tv/x"), Err(AppError::Pool(_))));
        assert!(matches!(index.all_tags(), Err(AppError::Pool(_))));
    }
}
