use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::error::MatchError;

/// Minutes in a day; the largest valid end minute
pub const MINUTES_PER_DAY: u16 = 1440;

/// A weekly availability window, e.g. `Monday 09:00-12:00`
///
/// Invariant: `start_minute < end_minute <= 1440`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub day: String,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl TimeSlot {
    #[inline]
    pub fn duration_minutes(&self) -> u16 {
        self.end_minute - self.start_minute
    }

    /// Minutes shared with another slot on the same day (0 for different days)
    #[inline]
    pub fn intersection_minutes(&self, other: &TimeSlot) -> u16 {
        if self.day != other.day {
            return 0;
        }
        let start = self.start_minute.max(other.start_minute);
        let end = self.end_minute.min(other.end_minute);
        end.saturating_sub(start)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            format_minutes(self.start_minute),
            format_minutes(self.end_minute)
        )
    }
}

/// Parse a `"<Day> <H:MM>-<H:MM>"` availability string
///
/// Returns `None` for anything malformed; availability is best-effort data.
pub fn parse_slot(raw: &str) -> Option<TimeSlot> {
    let raw = raw.trim();
    let (day, range) = raw.split_once(char::is_whitespace)?;
    let (start, end) = range.trim().split_once('-')?;

    let start_minute = parse_clock(start.trim())?;
    let end_minute = parse_clock(end.trim())?;

    if start_minute >= end_minute {
        return None;
    }

    Some(TimeSlot {
        day: day.to_string(),
        start_minute,
        end_minute,
    })
}

/// Parse every slot string, skipping malformed entries and exact duplicates
pub fn parse_availability<S: AsRef<str>>(raw: &[S]) -> Vec<TimeSlot> {
    let mut seen = HashSet::new();
    let mut slots = Vec::with_capacity(raw.len());

    for entry in raw {
        let entry = entry.as_ref();
        match parse_slot(entry) {
            Some(slot) => {
                if seen.insert(slot.clone()) {
                    slots.push(slot);
                }
            }
            None => tracing::debug!("Skipping malformed availability slot: {:?}", entry),
        }
    }

    slots
}

/// Parse `H:MM` / `HH:MM` into minutes since midnight (`24:00` allowed)
fn parse_clock(raw: &str) -> Option<u16> {
    let (hours, minutes) = raw.split_once(':')?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().all(|b| b.is_ascii_digit()) || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }

    let total = hours * 60 + minutes;
    (total <= MINUTES_PER_DAY).then_some(total)
}

/// Format minutes since midnight as `HH:MM`
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Ordered set of day labels used to sort and space meetings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOrder {
    labels: Vec<String>,
}

impl DayOrder {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Result<Self, MatchError> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            return Err(MatchError::EmptyDayOrder);
        }
        Ok(Self { labels })
    }

    /// Monday through Friday
    pub fn weekdays() -> Self {
        Self {
            labels: ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    /// Ordinal position of a day label, if it belongs to this order
    pub fn position(&self, day: &str) -> Option<usize> {
        self.labels.iter().position(|label| label == day)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for DayOrder {
    fn default() -> Self {
        Self::weekdays()
    }
}
