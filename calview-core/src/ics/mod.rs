//! ICS file parsing.
//!
//! Only the parts of RFC 5545 a class schedule needs are read: SUMMARY,
//! LOCATION, DTSTART, DTEND and RRULE.

mod parse;

pub use parse::parse_calendar;
