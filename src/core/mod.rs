// Core algorithm exports
pub mod assignment;
pub mod error;
pub mod filters;
pub mod matcher;
pub mod meetings;
pub mod overlap;
pub mod scoring;
pub mod session;
pub mod timeslot;

pub use assignment::{assignment_total, solve_assignment};
pub use error::{Ineligibility, MatchError};
pub use filters::{check_eligibility, is_eligible};
pub use matcher::{BatchOutcome, MatchConfig, Matcher, Recommendation};
pub use meetings::{propose_meetings, Meeting};
pub use overlap::{compute_overlap, OverlapResult, OverlapSlot};
pub use scoring::{calculate_match_score, is_ineligible_score, INELIGIBLE_SCORE};
pub use session::{MatchingSession, SessionError, SessionState};
pub use timeslot::{parse_availability, parse_slot, DayOrder, TimeSlot};
