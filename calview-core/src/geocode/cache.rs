//! Process-wide memo of geocode lookups.
//!
//! Entries are never evicted or invalidated. Location strings are low
//! cardinality and providers give stable answers, so the map stays small for
//! the life of the process. Concurrent writers may race; the loser overwrites
//! an equivalent value.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{GeocodeOutcome, UnresolvedReason};
use crate::geo::Coordinates;

/// Cache key: the query string plus the bias point it was issued with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    bias: Option<String>,
}

impl CacheKey {
    pub fn new(query: &str, bias: Option<Coordinates>) -> Self {
        CacheKey {
            query: query.to_string(),
            // Rounded to ~1 m so float noise does not fragment the cache.
            bias: bias.map(|b| format!("{:.5},{:.5}", b.lat, b.lng)),
        }
    }
}

#[derive(Debug)]
pub struct LocationCache {
    entries: Option<RwLock<HashMap<CacheKey, GeocodeOutcome>>>,
}

impl Default for LocationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationCache {
    pub fn new() -> Self {
        LocationCache {
            entries: Some(RwLock::new(HashMap::new())),
        }
    }

    /// A cache that stores nothing.
    pub fn disabled() -> Self {
        LocationCache { entries: None }
    }

    pub fn get(&self, key: &CacheKey) -> Option<GeocodeOutcome> {
        let entries = self.entries.as_ref()?.read().ok()?;
        entries.get(key).cloned()
    }

    /// Remember an outcome. Transient failures are not stored.
    pub fn insert(&self, key: CacheKey, outcome: &GeocodeOutcome) {
        if !Self::is_cacheable(outcome) {
            return;
        }
        if let Some(mut entries) = self.entries.as_ref().and_then(|e| e.write().ok()) {
            entries.insert(key, outcome.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .as_ref()
            .and_then(|e| e.read().ok().map(|m| m.len()))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_cacheable(outcome: &GeocodeOutcome) -> bool {
        matches!(
            outcome,
            GeocodeOutcome::Located { .. }
                | GeocodeOutcome::Unresolved {
                    reason: UnresolvedReason::NoMatch
                }
        )
    }
}
