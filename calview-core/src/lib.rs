//! Core types for calview.
//!
//! Turns a student's class schedule (.ics) into concrete, dated occurrences
//! with coordinates:
//! - `ics` parses VEVENTs into [`RawEvent`]s
//! - `recurrence` expands repeat rules into dates
//! - `location` cleans free-text locations for geocoding
//! - `geocode` wraps a provider lookup and scores its confidence
//! - `cluster` infers a campus anchor and corrects stray lookups
//! - `pipeline` runs the whole thing for one file

pub mod cluster;
pub mod config;
pub mod error;
pub mod event;
pub mod geo;
pub mod geocode;
pub mod ics;
pub mod location;
pub mod occurrence;
pub mod pipeline;
pub mod recurrence;
pub mod school;

pub use error::{CalViewError, CalViewResult};
pub use event::RawEvent;
pub use geo::Coordinates;
pub use occurrence::{Occurrence, OccurrenceRecord};
pub use pipeline::CalendarPipeline;
