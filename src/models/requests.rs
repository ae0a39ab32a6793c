use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::matcher::MatchConfig;
use crate::models::domain::{FilterRule, Person, Side};

/// Per-request overrides of the configured scoring weights
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WeightsOverride {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "waitingTimeWeight")]
    pub waiting_time_weight: Option<f64>,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(rename = "qualityWeight")]
    pub quality_weight: Option<f64>,
    #[serde(rename = "qualitySide")]
    pub quality_side: Option<Side>,
    #[validate(range(min = 1, max = 7))]
    #[serde(rename = "minOverlapDays")]
    pub min_overlap_days: Option<u8>,
}

/// Per-request overrides of the configured hard filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiltersOverride {
    pub language: Option<bool>,
    #[serde(rename = "liveScan")]
    pub live_scan: Option<bool>,
    #[serde(rename = "languageRule")]
    pub language_rule: Option<FilterRule>,
    #[serde(rename = "liveScanRule")]
    pub live_scan_rule: Option<FilterRule>,
    #[serde(rename = "requiringSide")]
    pub requiring_side: Option<Side>,
}

/// Apply optional overrides on top of a base configuration
///
/// The result still has to go through `Matcher::new` for validation.
pub fn apply_overrides(
    base: &MatchConfig,
    weights: Option<&WeightsOverride>,
    filters: Option<&FiltersOverride>,
) -> MatchConfig {
    let mut config = base.clone();

    if let Some(w) = weights {
        if let Some(value) = w.waiting_time_weight {
            config.weights.waiting_time = value;
        }
        if let Some(value) = w.quality_weight {
            config.weights.quality = value;
        }
        if let Some(side) = w.quality_side {
            config.weights.quality_side = side;
        }
        if let Some(days) = w.min_overlap_days {
            config.min_overlap_days = days;
        }
    }

    if let Some(f) = filters {
        config.filters.language = f.language.unwrap_or(config.filters.language);
        config.filters.live_scan = f.live_scan.unwrap_or(config.filters.live_scan);
        config.filters.language_rule = f.language_rule.unwrap_or(config.filters.language_rule);
        config.filters.live_scan_rule = f.live_scan_rule.unwrap_or(config.filters.live_scan_rule);
        config.filters.requiring_side = f.requiring_side.unwrap_or(config.filters.requiring_side);
    }

    config
}

/// Request to match two whole pools
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchMatchRequest {
    #[serde(rename = "poolA", alias = "students")]
    pub pool_a: Vec<Person>,
    #[serde(rename = "poolB", alias = "tutors")]
    pub pool_b: Vec<Person>,
    #[validate(nested)]
    #[serde(default)]
    pub weights: Option<WeightsOverride>,
    #[serde(default)]
    pub filters: Option<FiltersOverride>,
}

/// Request to pair two people directly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualMatchRequest {
    #[serde(rename = "personA", alias = "student")]
    pub person_a: Person,
    #[serde(rename = "personB", alias = "tutor")]
    pub person_b: Person,
}

/// Request for the raw overlap between two availability lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlapRequest {
    #[serde(rename = "availabilityA")]
    pub availability_a: Vec<String>,
    #[serde(rename = "availabilityB")]
    pub availability_b: Vec<String>,
}

/// Request for ranked candidates for one person
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    pub person: Person,
    /// Pool the selected person belongs to
    pub side: Side,
    pub candidates: Vec<Person>,
    #[validate(range(min = 1, max = 50))]
    #[serde(default)]
    pub limit: Option<usize>,
}
