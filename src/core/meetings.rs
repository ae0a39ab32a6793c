use serde::{Deserialize, Serialize};

use crate::core::overlap::OverlapSlot;
use crate::core::timeslot::{format_minutes, DayOrder, MINUTES_PER_DAY};

/// Length callers assume when displaying a proposed meeting
pub const MEETING_DURATION_MINUTES: u16 = 60;

/// A proposed meeting start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub day: String,
    /// Start time as `HH:MM`
    pub time: String,
    pub start_minute: u16,
}

impl Meeting {
    fn starting_at(slot: &OverlapSlot) -> Self {
        Self {
            day: slot.day.clone(),
            time: format_minutes(slot.start_minute),
            start_minute: slot.start_minute,
        }
    }

    /// `HH:MM-HH:MM` assuming the standard meeting length
    pub fn display_range(&self) -> String {
        let end = (self.start_minute + MEETING_DURATION_MINUTES).min(MINUTES_PER_DAY);
        format!("{}-{}", self.time, format_minutes(end))
    }
}

/// Pick two meeting starts from a pair's overlapping windows
///
/// Prefers a second meeting at least two days after the first; falls back to
/// the next window in day order when no such window exists. Days missing
/// from `day_order` sort last and never count as well spaced.
pub fn propose_meetings(slots: &[OverlapSlot], day_order: &DayOrder) -> Vec<Meeting> {
    if slots.len() < 2 {
        return Vec::new();
    }

    let mut sorted: Vec<(Option<usize>, &OverlapSlot)> = slots
        .iter()
        .map(|slot| (day_order.position(&slot.day), slot))
        .collect();
    // Stable: windows on the same day keep their input order
    sorted.sort_by_key(|(position, _)| position.unwrap_or(usize::MAX));

    let (first_position, first) = sorted[0];
    let second = sorted[1..]
        .iter()
        .find(|(position, _)| match (first_position, position) {
            (Some(first), Some(other)) => other.abs_diff(first) > 1,
            _ => false,
        })
        .unwrap_or(&sorted[1])
        .1;

    vec![Meeting::starting_at(first), Meeting::starting_at(second)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: &str, start_minute: u16) -> OverlapSlot {
        OverlapSlot {
            day: day.to_string(),
            start_minute,
            end_minute: start_minute + 90,
            overlap_minutes: 90,
        }
    }

    fn days(meetings: &[Meeting]) -> Vec<&str> {
        meetings.iter().map(|m| m.day.as_str()).collect()
    }

    #[test]
    fn test_fewer_than_two_slots() {
        let order = DayOrder::weekdays();
        assert!(propose_meetings(&[], &order).is_empty());
        assert!(propose_meetings(&[slot("Monday", 540)], &order).is_empty());
    }

    #[test]
    fn test_adjacent_days_fall_back_to_second_slot() {
        let order = DayOrder::weekdays();
        let meetings = propose_meetings(&[slot("Tuesday", 600), slot("Monday", 540)], &order);

        assert_eq!(days(&meetings), vec!["Monday", "Tuesday"]);
        assert_eq!(meetings[0].time, "09:00");
        assert_eq!(meetings[1].time, "10:00");
    }

    #[test]
    fn test_prefers_well_spaced_day() {
        let order = DayOrder::weekdays();
        let meetings = propose_meetings(
            &[
                slot("Tuesday", 540),
                slot("Thursday", 600),
                slot("Monday", 660),
                slot("Friday", 540),
            ],
            &order,
        );

        assert_eq!(days(&meetings), vec!["Monday", "Thursday"]);
        assert_eq!(meetings[0].time, "11:00");
    }

    #[test]
    fn test_same_day_windows_fall_back() {
        let order = DayOrder::weekdays();
        let meetings = propose_meetings(&[slot("Wednesday", 540), slot("Wednesday", 840)], &order);

        assert_eq!(days(&meetings), vec!["Wednesday", "Wednesday"]);
        assert_eq!(meetings[1].time, "14:00");
    }

    #[test]
    fn test_unknown_days_sort_last() {
        let order = DayOrder::weekdays();
        let meetings = propose_meetings(&[slot("Saturday", 540), slot("Wednesday", 600)], &order);

        assert_eq!(days(&meetings), vec!["Wednesday", "Saturday"]);
    }

    #[test]
    fn test_custom_day_order() {
        let order = DayOrder::new(["Sat", "Sun", "Mon"]).unwrap();
        let meetings = propose_meetings(&[slot("Sun", 540), slot("Mon", 540), slot("Sat", 540)], &order);

        assert_eq!(days(&meetings), vec!["Sat", "Mon"]);
    }

    #[test]
    fn test_display_range() {
        let order = DayOrder::weekdays();
        let meetings = propose_meetings(&[slot("Monday", 570), slot("Friday", 1410)], &order);

        assert_eq!(meetings[0].display_range(), "09:30-10:30");
        assert_eq!(meetings[1].display_range(), "23:30-24:00");
    }
}
