// src/error/types.rs
use crate::domain::{DomainError, SeriesRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An exact lookup matched more than one series
    #[error(
        "Expected one series, but found {}. Matching series: {}",
        .0.len(),
        list_series(.0)
    )]
    AmbiguousMatch(Vec<SeriesRecord>),

    #[error("Resource not found")]
    NotFound,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// Candidates behind an ambiguous match, empty for every other error
    pub fn ambiguous_candidates(&self) -> &[SeriesRecord] {
        match self {
            AppError::AmbiguousMatch(all) => all,
            _ => &[],
        }
    }
}

fn list_series(series: &[SeriesRecord]) -> String {
    series
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
