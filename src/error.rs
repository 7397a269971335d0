//! Error types for the ranking engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankingError>;

/// Caller contract violations. Numeric edge cases (empty unions, zero
/// normalization bases) are not errors and resolve to 0 instead.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("weight group '{group}' has {actual} components but {expected} are active")]
    WeightMismatch {
        group: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("weight group '{group}' component {index} is for '{actual}', expected '{expected}'")]
    WeightSubjectMismatch {
        group: &'static str,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error(
        "weight group '{group}' component {index} has invalid weight {weight} (must be 0..=100)"
    )]
    InvalidWeight {
        group: &'static str,
        index: usize,
        weight: f64,
    },

    #[error("weight group '{group}' has invalid max_val {value}")]
    InvalidMaxVal { group: &'static str, value: f64 },

    #[error("unknown paper: {0}")]
    UnknownPaper(String),

    #[error("history index {index} out of range ({len} snapshots)")]
    HistoryOutOfRange { index: usize, len: usize },

    #[error("invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
