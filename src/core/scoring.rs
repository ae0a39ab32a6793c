use crate::core::overlap::{find_overlapping_slots, OverlapStats};
use crate::core::timeslot::parse_availability;
use crate::models::{Person, ScoringWeights, Side};

/// Score of a pair that must never be selected
///
/// A reserved finite minimum rather than negative infinity, so it can sit in
/// a matrix without poisoning arithmetic.
pub const INELIGIBLE_SCORE: f64 = f64::MIN;

/// Full-week reference for the hours term
const REFERENCE_OVERLAP_HOURS: f64 = 5.0;

/// Waiting period at which the waiting term saturates
const MAX_WAITING_DAYS: f64 = 30.0;

/// Whether a matrix cell holds the ineligible sentinel
///
/// Negative infinity is accepted as a caller-side spelling of the sentinel.
#[inline]
pub fn is_ineligible_score(score: f64) -> bool {
    score <= INELIGIBLE_SCORE
}

/// The four weighted terms of a compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub days: f64,
    pub hours: f64,
    pub waiting: f64,
    pub quality: f64,
}

impl ScoreBreakdown {
    #[inline]
    pub fn total(&self) -> f64 {
        self.days + self.hours + self.waiting + self.quality
    }
}

/// Break a pair's score into its weighted terms
///
/// Scoring formula:
/// remaining = 1 - waiting_weight - quality_weight
/// score = (
///     overlapping_days * remaining / 2 +
///     (overlap_hours / 5) * remaining / 2 +
///     min(avg_waiting_days / 30, 1) * waiting_weight +
///     (quality / 100) * quality_weight
/// )
pub fn score_breakdown(
    person_a: &Person,
    person_b: &Person,
    stats: &OverlapStats,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let half_remaining = weights.remaining() / 2.0;

    let days = stats.overlapping_days as f64 * half_remaining;
    let hours = (stats.total_overlap_hours / REFERENCE_OVERLAP_HOURS) * half_remaining;

    let avg_waiting = (f64::from(person_a.waiting_days) + f64::from(person_b.waiting_days)) / 2.0;
    let waiting = (avg_waiting / MAX_WAITING_DAYS).min(1.0) * weights.waiting_time;

    let quality_source = match weights.quality_side {
        Side::A => person_a,
        Side::B => person_b,
    };
    let quality_value = quality_source
        .quality_score
        .filter(|q| q.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);
    let quality = (quality_value / 100.0) * weights.quality;

    ScoreBreakdown {
        days,
        hours,
        waiting,
        quality,
    }
}

/// Score a pair from precomputed overlap stats
///
/// Returns [`INELIGIBLE_SCORE`] when the pair shares fewer than
/// `min_overlap_days` days.
#[inline]
pub fn score_from_stats(
    person_a: &Person,
    person_b: &Person,
    stats: &OverlapStats,
    weights: &ScoringWeights,
    min_overlap_days: u8,
) -> f64 {
    if stats.overlapping_days < usize::from(min_overlap_days) {
        return INELIGIBLE_SCORE;
    }
    score_breakdown(person_a, person_b, stats, weights).total()
}

/// Calculate the compatibility score for a (pool A, pool B) pair
///
/// Pure: parses both availabilities, applies the day floor, then the weighted
/// formula. Hard filters are not applied here.
pub fn calculate_match_score(
    person_a: &Person,
    person_b: &Person,
    weights: &ScoringWeights,
    min_overlap_days: u8,
) -> f64 {
    let slots = find_overlapping_slots(
        &parse_availability(&person_a.availability),
        &parse_availability(&person_b.availability),
    );
    let stats = OverlapStats::from_slots(&slots);

    score_from_stats(person_a, person_b, &stats, weights, min_overlap_days)
}
