//! Geographic predicate evaluators
//!
//! Each context type decides whether the visitor's resolved location
//! satisfies a configured rule. Evaluators never fail: missing or
//! invalid configuration, unresolvable addresses, private addresses and
//! provider errors all evaluate to a non-match. Results are idempotent
//! and side-effect-free, so the host may cache or re-invoke freely.

pub mod continent;
pub mod country;
pub mod distance;

pub use continent::ContinentContext;
pub use country::CountryContext;
pub use distance::{haversine_distance, DistanceContext};

use http::HeaderMap;
use tracing::debug;

use crate::geoip::{GeoLocationRecord, GeolocationService};

/// Read access to the host's per-context configuration values.
///
/// Values are opaque strings under stable keys; an unset key reads as
/// the empty string. How the host stores them is not this crate's
/// concern.
pub trait ContextSettings {
    fn value(&self, key: &str) -> String;
}

impl ContextSettings for std::collections::HashMap<String, String> {
    fn value(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_default()
    }
}

/// Parse a comma-separated code list into trimmed, uppercased items.
pub(crate) fn parse_code_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_uppercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Apply the configured inversion flag as the final step.
pub(crate) fn apply_inversion(invert: bool, matched: bool) -> bool {
    if invert {
        !matched
    } else {
        matched
    }
}

/// Location for a request, with provider failures collapsed to absent.
pub(crate) fn resolve_location(
    service: &GeolocationService,
    headers: &HeaderMap,
    remote_addr: Option<&str>,
) -> Option<GeoLocationRecord> {
    match service.locate_for_request(headers, remote_addr) {
        Ok(location) => location,
        Err(err) => {
            debug!("Geolocation lookup failed, treating context as non-matching: {err}");
            None
        }
    }
}
