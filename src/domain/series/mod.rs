pub mod entity;
pub mod invariants;
pub mod matching;

pub use entity::SeriesRecord;
pub use invariants::validate_series;
pub use matching::SeriesMatch;
