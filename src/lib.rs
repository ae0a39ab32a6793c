//! Tutor Match - pairing engine for tutoring programs
//!
//! Scores every student/tutor pair on shared weekly availability, waiting time
//! and optional tutor quality, then pairs as many people as possible, preferring the
//! highest total score. Pairs that fail the hard filters (language, live-scan certification,
//! minimum overlapping days) are never matched.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use core::{
    compute_overlap, parse_availability, solve_assignment, DayOrder, MatchConfig, MatchError, Matcher,
    MatchingSession,
};
pub use models::{Match, MatchFilters, Person, ScoringWeights, Side};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let overlap = compute_overlap(
            &parse_availability(&["Monday 9:00-12:00"]),
            &parse_availability(&["Monday 10:00-13:00"]),
            &DayOrder::default(),
        );
        assert_eq!(overlap.overlapping_days, 1);
        assert_eq!(overlap.total_overlap_hours, 2.0);
    }
}
