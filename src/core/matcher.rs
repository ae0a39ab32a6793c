use std::cmp::Ordering;

use serde::Serialize;

use crate::core::{
    assignment::solve_assignment,
    error::{Ineligibility, MatchError},
    filters::check_eligibility_parsed,
    meetings::propose_meetings,
    overlap::{compute_overlap, find_overlapping_slots, OverlapResult, OverlapStats},
    scoring::{is_ineligible_score, score_from_stats, INELIGIBLE_SCORE},
    timeslot::{parse_availability, DayOrder, TimeSlot},
};
use crate::models::{Match, MatchFilters, Person, ScoringWeights, Side};

/// Everything a matching run needs, passed explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    pub weights: ScoringWeights,
    pub filters: MatchFilters,
    /// Hard floor on distinct overlapping days
    pub min_overlap_days: u8,
    pub day_order: DayOrder,
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        self.weights.validate()?;
        if self.min_overlap_days == 0 {
            return Err(MatchError::InvalidThreshold(self.min_overlap_days));
        }
        if self.day_order.labels().is_empty() {
            return Err(MatchError::EmptyDayOrder);
        }
        Ok(())
    }
}

/// Result of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub matches: Vec<Match>,
    #[serde(rename = "unmatchedA")]
    pub unmatched_a: Vec<Person>,
    #[serde(rename = "unmatchedB")]
    pub unmatched_b: Vec<Person>,
}

/// A ranked candidate for a single selected person
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub person: Person,
    pub score: f64,
    #[serde(rename = "overlappingDays")]
    pub overlapping_days: usize,
    #[serde(rename = "totalOverlapHours")]
    pub total_overlap_hours: f64,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Availability parsing (once per person)
/// 2. Hard eligibility filters
/// 3. Pairwise scoring into a score matrix
/// 4. Optimal assignment
/// 5. Re-validation and match construction
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

/// A person with availability parsed once up front
struct Prepared<'a> {
    person: &'a Person,
    slots: Vec<TimeSlot>,
}

impl<'a> Prepared<'a> {
    fn new(person: &'a Person) -> Self {
        Self {
            person,
            slots: parse_availability(&person.availability),
        }
    }
}

impl Matcher {
    /// Create a matcher, failing fast on invalid configuration
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Overlap report for a (pool A, pool B) pair
    pub fn overlap(&self, person_a: &Person, person_b: &Person) -> OverlapResult {
        compute_overlap(
            &parse_availability(&person_a.availability),
            &parse_availability(&person_b.availability),
            &self.config.day_order,
        )
    }

    /// Matrix cell for a pair: the score, or the sentinel when filtered out
    pub fn score_pair(&self, person_a: &Person, person_b: &Person) -> f64 {
        self.score_prepared(&Prepared::new(person_a), &Prepared::new(person_b))
    }

    fn score_prepared(&self, a: &Prepared<'_>, b: &Prepared<'_>) -> f64 {
        if check_eligibility_parsed(a.person, &a.slots, b.person, &b.slots, &self.config.filters).is_err() {
            return INELIGIBLE_SCORE;
        }

        let slots = find_overlapping_slots(&a.slots, &b.slots);
        let stats = OverlapStats::from_slots(&slots);
        score_from_stats(
            a.person,
            b.person,
            &stats,
            &self.config.weights,
            self.config.min_overlap_days,
        )
    }

    /// Build the full pool A × pool B score matrix
    pub fn score_matrix(&self, pool_a: &[Person], pool_b: &[Person]) -> Vec<Vec<f64>> {
        let prepared_a: Vec<Prepared<'_>> = pool_a.iter().map(Prepared::new).collect();
        let prepared_b: Vec<Prepared<'_>> = pool_b.iter().map(Prepared::new).collect();
        self.matrix_for(&prepared_a, &prepared_b)
    }

    fn matrix_for(&self, pool_a: &[Prepared<'_>], pool_b: &[Prepared<'_>]) -> Vec<Vec<f64>> {
        pool_a
            .iter()
            .map(|a| pool_b.iter().map(|b| self.score_prepared(a, b)).collect())
            .collect()
    }

    /// Match two whole pools
    ///
    /// Every pair the solver proposes is re-checked against the hard filters
    /// and the day floor before it becomes a [`Match`]. People left over end
    /// up in the unmatched lists in pool order.
    pub fn run_batch(&self, pool_a: &[Person], pool_b: &[Person]) -> Result<BatchOutcome, MatchError> {
        tracing::info!(
            "Running batch match: {} in pool A, {} in pool B",
            pool_a.len(),
            pool_b.len()
        );

        let prepared_a: Vec<Prepared<'_>> = pool_a.iter().map(Prepared::new).collect();
        let prepared_b: Vec<Prepared<'_>> = pool_b.iter().map(Prepared::new).collect();

        let matrix = self.matrix_for(&prepared_a, &prepared_b);
        let assignment = solve_assignment(&matrix)?;

        let mut matches = Vec::new();
        let mut unmatched_a = Vec::new();
        let mut matched_b = vec![false; pool_b.len()];

        for (row, col) in assignment.into_iter().enumerate() {
            let a = &prepared_a[row];
            let Some(col) = col else {
                tracing::debug!("No match found for {}", a.person.display_name());
                unmatched_a.push(a.person.clone());
                continue;
            };
            let b = &prepared_b[col];

            match self.build_match(a, b, true) {
                Ok(m) => {
                    matched_b[col] = true;
                    matches.push(m);
                }
                Err(reason) => {
                    tracing::debug!(
                        "Rejected proposed pair {} - {}: {}",
                        a.person.display_name(),
                        b.person.display_name(),
                        reason
                    );
                    unmatched_a.push(a.person.clone());
                }
            }
        }

        let unmatched_b: Vec<Person> = pool_b
            .iter()
            .zip(&matched_b)
            .filter(|(_, matched)| !**matched)
            .map(|(person, _)| person.clone())
            .collect();

        tracing::info!(
            "Batch complete: {} matches, {} unmatched in pool A, {} unmatched in pool B",
            matches.len(),
            unmatched_a.len(),
            unmatched_b.len()
        );

        Ok(BatchOutcome {
            matches,
            unmatched_a,
            unmatched_b,
        })
    }

    /// Pair two people directly, bypassing the solver
    ///
    /// Fails on empty availability or a hard filter violation. The day floor
    /// is not enforced for manual pairs.
    pub fn add_manual_match(&self, person_a: &Person, person_b: &Person) -> Result<Match, Ineligibility> {
        let a = Prepared::new(person_a);
        let b = Prepared::new(person_b);

        let result = self.build_match(&a, &b, false);
        match &result {
            Ok(m) => tracing::info!(
                "Manual match added: {} - {} ({} days, {}h)",
                person_a.display_name(),
                person_b.display_name(),
                m.overlapping_days,
                m.total_overlap_hours
            ),
            Err(reason) => tracing::info!(
                "Manual match rejected: {} - {}: {}",
                person_a.display_name(),
                person_b.display_name(),
                reason
            ),
        }
        result
    }

    fn build_match(&self, a: &Prepared<'_>, b: &Prepared<'_>, enforce_floor: bool) -> Result<Match, Ineligibility> {
        check_eligibility_parsed(a.person, &a.slots, b.person, &b.slots, &self.config.filters)?;

        let overlapping_slots = find_overlapping_slots(&a.slots, &b.slots);
        let stats = OverlapStats::from_slots(&overlapping_slots);

        if enforce_floor && stats.overlapping_days < usize::from(self.config.min_overlap_days) {
            return Err(Ineligibility::InsufficientOverlap {
                found: stats.overlapping_days,
                required: self.config.min_overlap_days,
            });
        }

        // Manual pairs below the floor still get a numeric score
        let score = score_from_stats(a.person, b.person, &stats, &self.config.weights, 1);
        let score = if is_ineligible_score(score) { 0.0 } else { score };
        let proposed_meetings = propose_meetings(&overlapping_slots, &self.config.day_order);

        Ok(Match {
            id: Match::pair_id(a.person, b.person),
            person_a: a.person.clone(),
            person_b: b.person.clone(),
            overlapping_days: stats.overlapping_days,
            total_overlap_hours: stats.total_overlap_hours,
            overlapping_slots,
            proposed_meetings,
            score,
        })
    }

    /// Rank candidates from the opposite pool for one selected person
    ///
    /// `side` is the pool `person` belongs to. Only eligible candidates that
    /// meet the day floor are returned, best first.
    pub fn recommend(
        &self,
        person: &Person,
        side: Side,
        candidates: &[Person],
        limit: usize,
    ) -> Vec<Recommendation> {
        let selected = Prepared::new(person);

        let mut ranked: Vec<(usize, Recommendation)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let other = Prepared::new(candidate);
                let (a, b) = match side {
                    Side::A => (&selected, &other),
                    Side::B => (&other, &selected),
                };

                let score = self.score_prepared(a, b);
                if is_ineligible_score(score) {
                    return None;
                }

                let stats = OverlapStats::from_slots(&find_overlapping_slots(&a.slots, &b.slots));
                Some((
                    index,
                    Recommendation {
                        person: candidate.clone(),
                        score,
                        overlapping_days: stats.overlapping_days,
                        total_overlap_hours: stats.total_overlap_hours,
                    },
                ))
            })
            .collect();

        // Score descending, then overlap hours descending, then input order
        ranked.sort_by(|(ia, a), (ib, b)| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    b.total_overlap_hours
                        .partial_cmp(&a.total_overlap_hours)
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| ia.cmp(ib))
        });
        ranked.truncate(limit);

        tracing::debug!(
            "Recommended {} of {} candidates for {}",
            ranked.len(),
            candidates.len(),
            person.display_name()
        );

        ranked.into_iter().map(|(_, rec)| rec).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FilterRule;

    fn create_person(id: &str, availability: &[&str], language: &str, waiting_days: u32) -> Person {
        Person {
            id: id.to_string(),
            name: Some(format!("Person {}", id)),
            availability: availability.iter().map(|s| s.to_string()).collect(),
            language: language.to_string(),
            additional_languages: vec![],
            live_scan: true,
            waiting_days,
            quality_score: None,
        }
    }

    fn config(waiting: f64, min_overlap_days: u8, language: bool) -> MatchConfig {
        MatchConfig {
            weights: ScoringWeights::new(waiting, 0.0),
            filters: MatchFilters {
                language,
                live_scan: false,
                language_rule: FilterRule::Strict,
                ..MatchFilters::default()
            },
            min_overlap_days,
            day_order: DayOrder::weekdays(),
        }
    }

    const MON_WED: [&str; 2] = ["Monday 9:00-12:00", "Wednesday 9:00-12:00"];

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(matches!(
            Matcher::new(config(1.5, 1, false)),
            Err(MatchError::InvalidWeight { .. })
        ));
        assert_eq!(
            Matcher::new(config(0.2, 0, false)).unwrap_err(),
            MatchError::InvalidThreshold(0)
        );
    }

    #[test]
    fn test_run_batch_basic() {
        let matcher = Matcher::new(config(0.2, 2, true)).unwrap();

        let students = vec![
            create_person("s1", &MON_WED, "English", 5),
            create_person("s2", &MON_WED, "Spanish", 5),
            create_person("s3", &["Friday 9:00-12:00"], "English", 5),
        ];
        let tutors = vec![
            create_person("t1", &MON_WED, "English", 0),
            create_person("t2", &MON_WED, "French", 0),
        ];

        let outcome = matcher.run_batch(&students, &tutors).unwrap();

        assert_eq!(outcome.matches.len(), 1);
        let m = &outcome.matches[0];
        assert_eq!(m.person_a.id, "s1");
        assert_eq!(m.person_b.id, "t1");
        assert_eq!(m.overlapping_days, 2);
        assert_eq!(m.total_overlap_hours, 6.0);
        assert_eq!(m.proposed_meetings.len(), 2);
        assert_eq!(m.proposed_meetings[0].day, "Monday");
        assert_eq!(m.proposed_meetings[1].day, "Wednesday");

        let unmatched_a: Vec<&str> = outcome.unmatched_a.iter().map(|p| p.id.as_str()).collect();
        let unmatched_b: Vec<&str> = outcome.unmatched_b.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(unmatched_a, vec!["s2", "s3"]);
        assert_eq!(unmatched_b, vec!["t2"]);
    }

    #[test]
    fn test_run_batch_empty_pools() {
        let matcher = Matcher::new(config(0.2, 1, false)).unwrap();
        let tutors = vec![create_person("t1", &MON_WED, "English", 0)];

        let outcome = matcher.run_batch(&[], &tutors).unwrap();
        assert!(outcome.matches.is_empty());
        assert!(outcome.unmatched_a.is_empty());
        assert_eq!(outcome.unmatched_b.len(), 1);
    }

    #[test]
    fn test_score_matrix_marks_ineligible() {
        let matcher = Matcher::new(config(0.0, 1, true)).unwrap();
        let students = vec![create_person("s1", &MON_WED, "English", 0)];
        let tutors = vec![
            create_person("t1", &MON_WED, "English", 0),
            create_person("t2", &MON_WED, "Spanish", 0),
            create_person("t3", &[], "English", 0),
        ];

        let matrix = matcher.score_matrix(&students, &tutors);
        assert!(!is_ineligible_score(matrix[0][0]));
        assert!(is_ineligible_score(matrix[0][1]));
        assert!(is_ineligible_score(matrix[0][2]));
    }

    #[test]
    fn test_manual_match_ignores_floor_but_not_filters() {
        let matcher = Matcher::new(config(0.2, 3, true)).unwrap();
        let student = create_person("s1", &["Monday 9:00-12:00"], "English", 0);
        let tutor = create_person("t1", &["Monday 10:00-11:00"], "English", 0);

        let m = matcher.add_manual_match(&student, &tutor).unwrap();
        assert_eq!(m.overlapping_days, 1);
        assert!(m.proposed_meetings.is_empty());
        assert!(m.score > 0.0);

        let spanish = create_person("t2", &["Monday 10:00-11:00"], "Spanish", 0);
        assert!(matches!(
            matcher.add_manual_match(&student, &spanish),
            Err(Ineligibility::LanguageMismatch { .. })
        ));

        let idle = create_person("t3", &[], "English", 0);
        assert_eq!(
            matcher.add_manual_match(&student, &idle),
            Err(Ineligibility::EmptyAvailability(Side::B))
        );
    }

    #[test]
    fn test_recommend_orders_and_limits() {
        let matcher = Matcher::new(config(0.0, 1, false)).unwrap();
        let student = create_person("s1", &["Monday 9:00-17:00", "Tuesday 9:00-17:00", "Thursday 9:00-17:00"], "English", 0);

        let tutors = vec![
            create_person("one-day", &["Monday 9:00-10:00"], "English", 0),
            create_person("three-days", &["Monday 9:00-12:00", "Tuesday 9:00-12:00", "Thursday 9:00-12:00"], "English", 0),
            create_person("no-overlap", &["Friday 9:00-12:00"], "English", 0),
            create_person("two-days", &["Monday 9:00-12:00", "Tuesday 9:00-12:00"], "English", 0),
        ];

        let recs = matcher.recommend(&student, Side::A, &tutors, 2);
        let ids: Vec<&str> = recs.iter().map(|r| r.person.id.as_str()).collect();
        assert_eq!(ids, vec!["three-days", "two-days"]);
        assert_eq!(recs[0].overlapping_days, 3);

        let all = matcher.recommend(&student, Side::A, &tutors, 10);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_recommend_from_pool_b_uses_pool_b_quality() {
        let mut weights_config = config(0.0, 1, false);
        weights_config.weights = ScoringWeights::new(0.0, 1.0);
        let matcher = Matcher::new(weights_config).unwrap();

        let mut tutor = create_person("t1", &MON_WED, "English", 0);
        tutor.quality_score = Some(90.0);
        let students = vec![create_person("s1", &MON_WED, "English", 0)];

        let recs = matcher.recommend(&tutor, Side::B, &students, 3);
        assert_eq!(recs.len(), 1);
        assert!((recs[0].score - 0.9).abs() < 1e-9);
    }
}
