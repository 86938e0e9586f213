// Outcome of an exact lookup that must resolve to at most one series.

use super::entity::SeriesRecord;
use crate::error::{AppError, AppResult};

/// Result of resolving an identifier to a single series
///
/// Ambiguity is a value, not a panic and not a silent "first match":
/// callers have to decide what to do with every outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesMatch {
    /// Exactly one series matched
    Found(SeriesRecord),

    /// Nothing matched
    NotFound,

    /// More than one series matched, all candidates included
    Ambiguous(Vec<SeriesRecord>),
}

impl SeriesMatch {
    /// Classify a candidate list by its length
    pub fn from_candidates(mut candidates: Vec<SeriesRecord>) -> Self {
        match candidates.len() {
            0 => SeriesMatch::NotFound,
            1 => SeriesMatch::Found(candidates.remove(0)),
            _ => SeriesMatch::Ambiguous(candidates),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SeriesMatch::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SeriesMatch::NotFound)
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, SeriesMatch::Ambiguous(_))
    }

    /// The matched series, if exactly one matched
    pub fn record(&self) -> Option<&SeriesRecord> {
        match self {
            SeriesMatch::Found(series) => Some(series),
            _ => None,
        }
    }

    /// Every series the lookup matched
    pub fn candidates(&self) -> &[SeriesRecord] {
        match self {
            SeriesMatch::Found(series) => std::slice::from_ref(series),
            SeriesMatch::NotFound => &[],
            SeriesMatch::Ambiguous(all) => all,
        }
    }

    /// Collapse into an optional series, turning ambiguity into an error
    pub fn into_single(self) -> AppResult<Option<SeriesRecord>> {
        match self {
            SeriesMatch::Found(series) => Ok(Some(series)),
            SeriesMatch::NotFound => Ok(None),
            SeriesMatch::Ambiguous(all) => Err(AppError::AmbiguousMatch(all)),
        }
    }
}
