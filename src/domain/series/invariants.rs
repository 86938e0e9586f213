use super::entity::SeriesRecord;
use crate::domain::{DomainError, DomainResult};

/// Validates the shape of a series before it is written
/// Uniqueness of clean title, slug and external ID is NOT checked here
pub fn validate_series(series: &SeriesRecord) -> DomainResult<()> {
    validate_not_blank("title", &series.title)?;
    validate_normalized("clean title", &series.clean_title)?;
    validate_normalized("title slug", &series.title_slug)?;
    validate_not_blank("path", &series.path)?;
    Ok(())
}

fn validate_not_blank(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::InvariantViolation(format!(
            "Series {} cannot be empty",
            field
        )));
    }
    Ok(())
}

/// Normalized values are compared after lower-casing the input, so they
/// must already be stored lower case or they can never match
fn validate_normalized(field: &str, value: &str) -> DomainResult<()> {
    validate_not_blank(field, value)?;

    if value.to_lowercase() != value {
        return Err(DomainError::InvariantViolation(format!(
            "Series {} '{}' must be lower case",
            field, value
        )));
    }
    Ok(())
}
