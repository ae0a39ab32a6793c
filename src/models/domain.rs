use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::MatchError;
use crate::core::meetings::Meeting;
use crate::core::overlap::OverlapSlot;

/// A person waiting to be paired (student or tutor)
///
/// Field mapping from any backing store happens before this point; the
/// engine only reads these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub language: String,
    /// Extra languages this person can serve in. Only consulted by the
    /// directional language rule.
    #[serde(rename = "additionalLanguages", default)]
    pub additional_languages: Vec<String>,
    #[serde(rename = "liveScan", alias = "liveScanCertified", default)]
    pub live_scan: bool,
    #[serde(rename = "waitingDays", default)]
    pub waiting_days: u32,
    #[serde(rename = "qualityScore", alias = "TQuality", default)]
    pub quality_score: Option<f64>,
}

impl Person {
    /// Name for log lines, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Whether this person can work in the given language
    pub fn speaks(&self, language: &str) -> bool {
        self.language == language || self.additional_languages.iter().any(|l| l == language)
    }
}

/// One of the two pools being matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Rows of the score matrix (students)
    A,
    /// Columns of the score matrix (tutors)
    B,
}

/// How a hard filter compares the two sides of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterRule {
    /// Both sides must carry the same value
    Strict,
    /// Only the requiring side's need must be met by the other side
    #[default]
    Directional,
}

/// Hard eligibility filters applied before scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFilters {
    pub language: bool,
    pub live_scan: bool,
    #[serde(default)]
    pub language_rule: FilterRule,
    #[serde(default)]
    pub live_scan_rule: FilterRule,
    #[serde(default = "default_requiring_side")]
    pub requiring_side: Side,
}

fn default_requiring_side() -> Side {
    Side::A
}

impl Default for MatchFilters {
    /// No hard filters active
    fn default() -> Self {
        Self {
            language: false,
            live_scan: false,
            language_rule: FilterRule::default(),
            live_scan_rule: FilterRule::default(),
            requiring_side: default_requiring_side(),
        }
    }
}

/// Scoring weights
///
/// Whatever is left after the waiting and quality weights is split evenly
/// between the overlapping-days and overlapping-hours terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub waiting_time: f64,
    #[serde(default)]
    pub quality: f64,
    /// Pool whose members carry the quality score
    #[serde(default = "default_quality_side")]
    pub quality_side: Side,
}

fn default_quality_side() -> Side {
    Side::B
}

impl ScoringWeights {
    pub fn new(waiting_time: f64, quality: f64) -> Self {
        Self {
            waiting_time,
            quality,
            quality_side: default_quality_side(),
        }
    }

    pub fn with_quality_side(mut self, side: Side) -> Self {
        self.quality_side = side;
        self
    }

    /// Weight shared by the two overlap terms
    #[inline]
    pub fn remaining(&self) -> f64 {
        1.0 - self.waiting_time - self.quality
    }

    /// Check the weight invariants
    pub fn validate(&self) -> Result<(), MatchError> {
        for (name, value) in [("waiting_time", self.waiting_time), ("quality", self.quality)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MatchError::InvalidWeight { name, value });
            }
        }

        let sum = self.waiting_time + self.quality;
        if sum > 1.0 + 1e-9 {
            return Err(MatchError::WeightSumExceeded(sum));
        }

        Ok(())
    }
}

/// A finalized pairing handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    #[serde(rename = "personA")]
    pub person_a: Person,
    #[serde(rename = "personB")]
    pub person_b: Person,
    #[serde(rename = "overlappingDays")]
    pub overlapping_days: usize,
    #[serde(rename = "totalOverlapHours")]
    pub total_overlap_hours: f64,
    #[serde(rename = "overlappingSlots")]
    pub overlapping_slots: Vec<OverlapSlot>,
    #[serde(rename = "proposedMeetings")]
    pub proposed_meetings: Vec<Meeting>,
    pub score: f64,
}

impl Match {
    /// Deterministic id for a pair, so repeated runs produce the same ids
    pub fn pair_id(person_a: &Person, person_b: &Person) -> Uuid {
        let key = format!("{}\u{1f}{}", person_a.id, person_b.id);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
    }
}
