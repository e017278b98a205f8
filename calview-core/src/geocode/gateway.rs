//! Best-effort single-address lookup.

use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, warn};

use super::cache::{CacheKey, LocationCache};
use super::provider::GeocodeProvider;
use super::{GeocodeOutcome, UnresolvedReason};
use crate::geo::{BoundingBox, Coordinates};

/// Half-width of the search box around a bias point (about 5 km).
pub const BIAS_DELTA_DEGREES: f64 = 0.05;

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Wraps a provider so that lookups never fail: every problem becomes
/// [`GeocodeOutcome::Unresolved`].
pub struct GeocodeGateway<'a, P> {
    provider: &'a P,
    cache: &'a LocationCache,
    timeout: Duration,
}

impl<'a, P: GeocodeProvider> GeocodeGateway<'a, P> {
    pub fn new(provider: &'a P, cache: &'a LocationCache) -> Self {
        GeocodeGateway {
            provider,
            cache,
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Geocode `address`, optionally constrained to a box around `bias`.
    ///
    /// The provider's first candidate is taken as the answer.
    pub async fn lookup(&self, address: &str, bias: Option<Coordinates>) -> GeocodeOutcome {
        let address = address.trim();
        if address.is_empty() {
            return GeocodeOutcome::unresolved(UnresolvedReason::EmptyAddress);
        }

        let key = CacheKey::new(address, bias);
        if let Some(cached) = self.cache.get(&key) {
            debug!(address, "Geocode cache hit");
            return cached;
        }

        let bounds = bias.map(|b| BoundingBox::around(b, BIAS_DELTA_DEGREES));
        debug!(address, ?bounds, "Geocoding");

        let outcome = match timeout(self.timeout, self.provider.geocode(address, bounds)).await {
            Err(_) => {
                warn!(address, timeout_secs = self.timeout.as_secs(), "Geocoding timed out");
                GeocodeOutcome::unresolved(UnresolvedReason::Timeout)
            }
            Ok(Err(e)) => {
                warn!(address, error = %e, "Geocoding failed");
                GeocodeOutcome::unresolved(UnresolvedReason::Provider(e.to_string()))
            }
            Ok(Ok(candidates)) => match candidates.into_iter().next() {
                Some(best) => GeocodeOutcome::located(best),
                None => {
                    debug!(address, "No geocode candidates");
                    GeocodeOutcome::unresolved(UnresolvedReason::NoMatch)
                }
            },
        };

        self.cache.insert(key, &outcome);
        outcome
    }
}
