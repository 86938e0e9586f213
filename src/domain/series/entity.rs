use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A series in the catalog
///
/// Only `id` is guaranteed unique. Clean titles, slugs and external IDs can
/// collide (remakes, bad imports); lookups deal with that at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRecord {
    /// Primary key, 0 until the store assigns one
    pub id: i64,

    /// ID in the external catalog
    pub external_id: i32,

    /// Display title
    pub title: String,

    /// Lowercase, punctuation-stripped title
    pub clean_title: String,

    /// URL-safe identifier
    pub title_slug: String,

    /// Release year
    pub year: i32,

    /// Location on disk
    pub path: String,

    /// Tag IDs, `None` when the series was never tagged
    pub tags: Option<Vec<i32>>,

    pub added: DateTime<Utc>,
}

impl SeriesRecord {
    /// Create an unsaved series. Normalizing titles and slugs is the caller's job.
    pub fn new(
        external_id: i32,
        title: impl Into<String>,
        clean_title: impl Into<String>,
        title_slug: impl Into<String>,
        year: i32,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            external_id,
            title: title.into(),
            clean_title: clean_title.into(),
            title_slug: title_slug.into(),
            year,
            path: path.into(),
            tags: None,
            added: Utc::now(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<i32>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// True once the store has assigned an id
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

impl std::fmt::Display for SeriesRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}][{}]", self.external_id, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_external_id_and_title() {
        let series = SeriesRecord::new(73244, "The Office (US)", "theofficeus", "the-office-us", 2005, "/tv/The Office (US)");
        assert_eq!(series.to_string(), "[73244][The Office (US)]");
    }

    #[test]
    fn test_new_series_is_unsaved_and_untagged() {
        let series = SeriesRecord::new(1, "Show", "show", "show", 2000, "/tv/Show");
        assert!(!series.is_persisted());
        assert_eq!(series.tags, None);

        let tagged = series.with_tags(vec![]);
        assert_eq!(tagged.tags, Some(vec![]));
    }
}
