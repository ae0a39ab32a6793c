use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;

use crate::core::meetings::{propose_meetings, Meeting};
use crate::core::timeslot::{format_minutes, DayOrder, TimeSlot};

/// Shortest intersection that counts as a usable overlap
pub const MIN_OVERLAP_MINUTES: u16 = 60;

/// A qualifying intersection between one slot from each side
///
/// Serializes as `{day, time: "HH:MM-HH:MM", overlap}` plus the raw minute
/// fields; only the raw fields are read back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapSlot {
    pub day: String,
    pub start_minute: u16,
    pub end_minute: u16,
    pub overlap_minutes: u16,
}

impl OverlapSlot {
    /// `HH:MM-HH:MM` rendering of the shared window
    pub fn time_range(&self) -> String {
        format!(
            "{}-{}",
            format_minutes(self.start_minute),
            format_minutes(self.end_minute)
        )
    }
}

impl Serialize for OverlapSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OverlapSlot", 6)?;
        state.serialize_field("day", &self.day)?;
        state.serialize_field("time", &self.time_range())?;
        state.serialize_field("overlap", &self.overlap_minutes)?;
        state.serialize_field("startMinute", &self.start_minute)?;
        state.serialize_field("endMinute", &self.end_minute)?;
        state.serialize_field("overlapMinutes", &self.overlap_minutes)?;
        state.end()
    }
}

/// Overlap between two people's availability
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapResult {
    /// Distinct days with at least one qualifying window
    pub overlapping_days: usize,
    /// Sum of qualifying windows in hours, rounded to one decimal
    pub total_overlap_hours: f64,
    /// One entry per qualifying slot pair
    pub overlapping_slots: Vec<OverlapSlot>,
    pub proposed_meetings: Vec<Meeting>,
}

/// Day and hour totals for a set of qualifying windows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapStats {
    pub overlapping_days: usize,
    pub total_overlap_hours: f64,
}

impl OverlapStats {
    pub fn from_slots(slots: &[OverlapSlot]) -> Self {
        let days: HashSet<&str> = slots.iter().map(|s| s.day.as_str()).collect();
        let total_minutes: u32 = slots.iter().map(|s| u32::from(s.overlap_minutes)).sum();

        Self {
            overlapping_days: days.len(),
            total_overlap_hours: round_tenths(f64::from(total_minutes) / 60.0),
        }
    }
}

#[inline]
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Collect every same-day slot pair whose intersection is at least an hour
///
/// Duplicate slots on either side are only counted once.
pub fn find_overlapping_slots(a: &[TimeSlot], b: &[TimeSlot]) -> Vec<OverlapSlot> {
    let a = unique(a);
    let b = unique(b);
    let mut overlapping = Vec::new();

    for slot_a in &a {
        for slot_b in &b {
            let minutes = slot_a.intersection_minutes(slot_b);
            if minutes < MIN_OVERLAP_MINUTES {
                continue;
            }

            let start = slot_a.start_minute.max(slot_b.start_minute);
            overlapping.push(OverlapSlot {
                day: slot_a.day.clone(),
                start_minute: start,
                end_minute: start + minutes,
                overlap_minutes: minutes,
            });
        }
    }

    overlapping
}

fn unique(slots: &[TimeSlot]) -> Vec<&TimeSlot> {
    let mut seen = HashSet::new();
    slots.iter().filter(|slot| seen.insert(*slot)).collect()
}

/// Full overlap report for two availability lists, including meeting proposals
pub fn compute_overlap(a: &[TimeSlot], b: &[TimeSlot], day_order: &DayOrder) -> OverlapResult {
    if a.is_empty() || b.is_empty() {
        return OverlapResult::default();
    }

    let overlapping_slots = find_overlapping_slots(a, b);
    let stats = OverlapStats::from_slots(&overlapping_slots);
    let proposed_meetings = propose_meetings(&overlapping_slots, day_order);

    OverlapResult {
        overlapping_days: stats.overlapping_days,
        total_overlap_hours: stats.total_overlap_hours,
        overlapping_slots,
        proposed_meetings,
    }
}
