use thiserror::Error;

use crate::models::Side;

/// Configuration and solver failures
///
/// These are programmer/config errors: the caller is expected to fix the
/// input rather than retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("Invalid weight {name}: {value} (must be within 0..=1)")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Weights sum to {0}, which exceeds 1")]
    WeightSumExceeded(f64),

    #[error("Minimum overlap days must be at least 1, got {0}")]
    InvalidThreshold(u8),

    #[error("Day order must contain at least one day label")]
    EmptyDayOrder,

    #[error("Score matrix row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Score matrix cell ({row}, {col}) is not a usable number")]
    InvalidScore { row: usize, col: usize },

    #[error("Assignment solver failure: {0}")]
    Solver(String),
}

/// Why a pair cannot be matched
///
/// Ineligibility is an ordinary outcome, not a failure of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("{0:?} side has no usable availability")]
    EmptyAvailability(Side),

    #[error("Language mismatch: {required} required, {offered} offered")]
    LanguageMismatch { required: String, offered: String },

    #[error("Live Scan certification required but missing")]
    CertificationMissing,

    #[error("Only {found} overlapping day(s), {required} required")]
    InsufficientOverlap { found: usize, required: u8 },
}
