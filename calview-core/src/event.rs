//! Events as read from a calendar file, before expansion.

use chrono::{NaiveDate, NaiveTime};

use crate::location::normalize_location;
use crate::recurrence::RecurrenceRule;

/// Title used when a VEVENT has no SUMMARY.
pub const DEFAULT_TITLE: &str = "Untitled";

/// One VEVENT block.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub title: String,
    /// Location exactly as written in the file (may be empty).
    pub location: String,
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub rule: Option<RecurrenceRule>,
}

impl RawEvent {
    /// The recurrence rule, or a single-date rule when none was given.
    pub fn recurrence(&self) -> RecurrenceRule {
        self.rule
            .clone()
            .unwrap_or_else(|| RecurrenceRule::single(self.start_date))
    }

    /// Location cleaned for geocoding.
    pub fn cleaned_location(&self) -> String {
        normalize_location(&self.location)
    }
}

impl std::fmt::Display for RawEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}
