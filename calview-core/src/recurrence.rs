//! RRULE handling for class schedules.
//!
//! Class schedules only ever repeat weekly on a set of weekdays until the end
//! of term, so a rule is reduced to a weekday set plus an optional inclusive
//! end date. `FREQ`, `INTERVAL` and `COUNT` are not interpreted.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use tracing::{debug, warn};

/// Recurrence bounds outside these years are treated as malformed.
pub const UNTIL_YEAR_MIN: i32 = 2020;
pub const UNTIL_YEAR_MAX: i32 = 2030;

const WEEKDAY_CODES: [(&str, Weekday); 7] = [
    ("MO", Weekday::Mon),
    ("TU", Weekday::Tue),
    ("WE", Weekday::Wed),
    ("TH", Weekday::Thu),
    ("FR", Weekday::Fri),
    ("SA", Weekday::Sat),
    ("SU", Weekday::Sun),
];

/// Two-letter iCalendar code for a weekday ("MO", "TU", ...).
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// English weekday name ("Monday", ...).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a BYDAY entry. Ordinal prefixes (`1MO`, `-1FR`) are ignored.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    let code = code.trim();
    let suffix = code.get(code.len().checked_sub(2)?..)?;
    WEEKDAY_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(suffix))
        .map(|(_, day)| *day)
}

/// A weekly repeat rule bounded by an inclusive date range.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceRule {
    /// Weekdays the event falls on, in Monday-first order without duplicates.
    pub weekdays: Vec<Weekday>,
    pub start: NaiveDate,
    /// Inclusive end. `None` means the rule covers only `start`.
    pub until: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// A rule that yields exactly `start`.
    pub fn single(start: NaiveDate) -> Self {
        RecurrenceRule {
            weekdays: vec![start.weekday()],
            start,
            until: None,
        }
    }

    /// Build a rule from a raw RRULE value (`FREQ=WEEKLY;BYDAY=MO,WE;UNTIL=...`).
    ///
    /// Anything unusable degrades towards [`RecurrenceRule::single`] rather than
    /// failing, so an event always yields at least one date.
    pub fn from_rrule(raw: Option<&str>, start: NaiveDate) -> Self {
        let Some(raw) = raw else {
            return Self::single(start);
        };

        let mut weekdays = Vec::new();
        let mut until = None;

        for (key, value) in raw
            .split(';')
            .filter_map(|part| part.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()))
        {
            if key.eq_ignore_ascii_case("UNTIL") {
                until = parse_until(value);
            } else if key.eq_ignore_ascii_case("BYDAY") {
                weekdays = value.split(',').filter_map(weekday_from_code).collect();
            }
        }

        if weekdays.is_empty() {
            weekdays.push(start.weekday());
        }
        weekdays.sort_by_key(|d| d.num_days_from_monday());
        weekdays.dedup();

        if let Some(end) = until.filter(|end| *end < start) {
            warn!(%start, %end, "Recurrence ends before it starts, treating as single date");
            until = None;
        }

        let rule = RecurrenceRule {
            weekdays,
            start,
            until,
        };

        if rule.dates().next().is_none() {
            debug!(rrule = raw, "Recurrence matches no dates, treating as single date");
            return Self::single(start);
        }

        rule
    }

    /// Inclusive last date covered by the rule.
    pub fn end(&self) -> NaiveDate {
        self.until.unwrap_or(self.start)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end() && self.weekdays.contains(&date.weekday())
    }

    /// Dates covered by the rule, ascending. Call again to restart.
    pub fn dates(&self) -> DateSeries<'_> {
        DateSeries {
            rule: self,
            next: Some(self.start),
        }
    }
}

/// Lazy iterator over the dates of a [`RecurrenceRule`].
#[derive(Debug, Clone)]
pub struct DateSeries<'a> {
    rule: &'a RecurrenceRule,
    next: Option<NaiveDate>,
}

impl Iterator for DateSeries<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let end = self.rule.end();
        while let Some(current) = self.next {
            if current > end {
                self.next = None;
                break;
            }
            self.next = current.succ_opt();
            if self.rule.matches(current) {
                return Some(current);
            }
        }
        None
    }
}

/// Parse an UNTIL value in date or date-time form, rejecting implausible years.
fn parse_until(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim_end_matches(['Z', 'z']);

    let date = if trimmed.contains('T') {
        NaiveDateTime::parse_from_str(trimmed, "%Y%m%dT%H%M%S")
            .ok()
            .map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(trimmed, "%Y%m%d").ok()
    };

    match date {
        Some(d) if (UNTIL_YEAR_MIN..=UNTIL_YEAR_MAX).contains(&d.year()) => Some(d),
        Some(d) => {
            warn!(until = value, year = d.year(), "Ignoring out-of-range recurrence bound");
            None
        }
        None => {
            warn!(until = value, "Ignoring unparsable recurrence bound");
            None
        }
    }
}
