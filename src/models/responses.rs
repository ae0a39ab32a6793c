use serde::{Deserialize, Serialize};

use crate::core::matcher::{BatchOutcome, Recommendation};
use crate::models::domain::{Match, Person};

/// Response for the batch match endpoint
#[derive(Debug, Clone, Serialize)]
pub struct BatchMatchResponse {
    pub matches: Vec<Match>,
    #[serde(rename = "unmatchedA")]
    pub unmatched_a: Vec<Person>,
    #[serde(rename = "unmatchedB")]
    pub unmatched_b: Vec<Person>,
    #[serde(rename = "totalMatched")]
    pub total_matched: usize,
}

impl From<BatchOutcome> for BatchMatchResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            total_matched: outcome.matches.len(),
            matches: outcome.matches,
            unmatched_a: outcome.unmatched_a,
            unmatched_b: outcome.unmatched_b,
        }
    }
}

/// Response for the recommendation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
