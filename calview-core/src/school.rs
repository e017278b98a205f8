//! Institution-specific hints for turning a room name into a geocodable query.
//!
//! Uploads carry a free-text context hint (usually the school name). When the
//! hint matches a known school, its name and city are appended to each
//! location, and a small alias table rewrites building names that providers
//! are known to resolve badly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    /// Lowercase lookup key, matched against the context hint.
    pub key: String,
    pub name: String,
    pub city: String,
    /// Campus centre, used as a last-resort anchor.
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    /// Lowercase substring of a cleaned location -> full street address.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl School {
    /// Street address for `cleaned` if one of the aliases applies.
    pub fn alias_for(&self, cleaned: &str) -> Option<&str> {
        let lower = cleaned.to_lowercase();
        self.aliases
            .iter()
            .find(|(pattern, _)| lower.contains(pattern.to_lowercase().as_str()))
            .map(|(_, address)| address.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolDirectory {
    schools: Vec<School>,
}

impl SchoolDirectory {
    pub fn new(schools: Vec<School>) -> Self {
        SchoolDirectory { schools }
    }

    /// Schools known without any configuration.
    pub fn builtin() -> Self {
        let physics = "382 McCormick Rd, Charlottesville, VA 22904".to_string();
        SchoolDirectory::new(vec![School {
            key: "university of virginia".into(),
            name: "University of Virginia".into(),
            city: "Charlottesville, VA".into(),
            coordinates: Some(Coordinates::new(38.0336, -78.5080)),
            aliases: BTreeMap::from([
                ("physics".to_string(), physics.clone()),
                ("physics building".to_string(), physics.clone()),
                ("jesse beams lab".to_string(), physics),
            ]),
        }])
    }

    /// Add `other`'s schools, replacing any with the same key.
    pub fn merge(mut self, other: SchoolDirectory) -> Self {
        for school in other.schools {
            self.schools.retain(|s| s.key != school.key);
            self.schools.push(school);
        }
        self
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Find a school by hint: exact key or name first, then partial match
    /// in either direction.
    pub fn find(&self, hint: &str) -> Option<&School> {
        let hint = hint.trim().to_lowercase();
        if hint.is_empty() {
            return None;
        }

        self.schools
            .iter()
            .find(|s| s.key == hint || s.name.to_lowercase() == hint)
            .or_else(|| {
                self.schools
                    .iter()
                    .find(|s| hint.contains(s.key.as_str()) || s.key.contains(hint.as_str()))
            })
    }

    /// Build the geocoder query for a cleaned location.
    pub fn query_for(&self, cleaned: &str, hint: &str) -> String {
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return String::new();
        }

        if let Some(school) = self.find(hint) {
            if let Some(address) = school.alias_for(cleaned) {
                return address.to_string();
            }
            return format!("{}, {}, {}", cleaned, school.name, school.city);
        }

        let hint = hint.trim();
        if hint.is_empty() {
            cleaned.to_string()
        } else {
            format!("{}, {}", cleaned, hint)
        }
    }
}
