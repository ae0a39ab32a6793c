// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FilterRule, Match, MatchFilters, Person, ScoringWeights, Side};
pub use requests::{apply_overrides, BatchMatchRequest, FiltersOverride, ManualMatchRequest, OverlapRequest, RecommendRequest, WeightsOverride};
pub use responses::{BatchMatchResponse, ErrorResponse, HealthResponse, RecommendResponse};
