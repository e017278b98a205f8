//! Location string cleanup ahead of geocoding.
//!
//! Schedules exported from student information systems abbreviate building
//! names and append room codes ("Eng Bldg 204B"). Geocoders do better with
//! "Engineering Building", so trailing codes are dropped and known
//! abbreviations expanded.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Whole-word abbreviations and their expansions, matched case-insensitively.
///
/// No expansion may itself contain a key as a whole word, otherwise
/// normalization would stop being idempotent.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("bldg", "Building"),
    ("bld", "Building"),
    ("blg", "Building"),
    ("rm", "Room"),
    ("rms", "Rooms"),
    ("eng", "Engineering"),
    ("engr", "Engineering"),
    ("engg", "Engineering"),
    ("sci", "Science"),
    ("scis", "Sciences"),
    ("ctr", "Center"),
    ("cntr", "Center"),
    ("lib", "Library"),
    ("aud", "Auditorium"),
    ("hl", "Hall"),
    ("admin", "Administration"),
    ("phys", "Physics"),
    ("chem", "Chemistry"),
    ("bio", "Biology"),
    ("psych", "Psychology"),
    ("econ", "Economics"),
    ("comp", "Computer"),
    ("mech", "Mechanical"),
    ("elec", "Electrical"),
    ("envr", "Environmental"),
    ("med", "Medical"),
    ("educ", "Education"),
    ("gym", "Gymnasium"),
    ("rec", "Recreation"),
    ("stu", "Student"),
    ("univ", "University"),
    ("coll", "College"),
    ("dept", "Department"),
    ("flr", "Floor"),
    ("ste", "Suite"),
    ("ave", "Avenue"),
    ("blvd", "Boulevard"),
    ("mus", "Music"),
];

static EXPANSIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ABBREVIATIONS.iter().copied().collect());

static ABBREVIATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = ABBREVIATIONS
        .iter()
        .map(|(abbr, _)| regex::escape(abbr))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("abbreviation table is a valid regex")
});

/// Clean a raw location for geocoding.
///
/// Empty input gives empty output. Normalizing twice is the same as once.
pub fn normalize_location(raw: &str) -> String {
    let stripped = strip_trailing_codes(raw);
    if stripped.is_empty() {
        return String::new();
    }
    expand_abbreviations(stripped)
}

/// Expand known abbreviations ("Eng Bldg" -> "Engineering Building").
pub fn expand_abbreviations(text: &str) -> String {
    ABBREVIATION_RE
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            EXPANSIONS
                .get(matched.to_ascii_lowercase().as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| matched.to_string())
        })
        .into_owned()
}

/// Drop trailing room/suite codes: anything after the last letter, comma,
/// period or hyphen.
fn strip_trailing_codes(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| !(c.is_alphabetic() || matches!(c, ',' | '.' | '-')))
        .trim_start()
}
