//! Continent membership predicate

use std::sync::Arc;

use http::HeaderMap;

use crate::geoip::GeolocationService;

use super::{apply_inversion, parse_code_list, resolve_location, ContextSettings};

/// Matches when the visitor's continent is in a configured list.
///
/// Detected continent codes come from the provider and are always one
/// of [`ContinentContext::VALID_CODES`]. Configured codes outside that
/// set are not rejected; they simply never match.
pub struct ContinentContext {
    service: Arc<GeolocationService>,
    invert: bool,
}

impl ContinentContext {
    /// Settings key holding the comma-separated continent code list
    pub const SETTING_CONTINENTS: &'static str = "continents";

    /// The continent codes a provider can detect
    pub const VALID_CODES: [&'static str; 7] = ["AF", "AN", "AS", "EU", "NA", "OC", "SA"];

    pub fn new(service: Arc<GeolocationService>, invert: bool) -> Self {
        Self { service, invert }
    }

    /// Evaluate the predicate for a request.
    pub fn matches(
        &self,
        settings: &dyn ContextSettings,
        headers: &HeaderMap,
        remote_addr: Option<&str>,
    ) -> bool {
        let configured = parse_code_list(&settings.value(Self::SETTING_CONTINENTS));
        if configured.is_empty() {
            return apply_inversion(self.invert, false);
        }

        let matched = resolve_location(&self.service, headers, remote_addr)
            .and_then(|location| location.continent_code)
            .map(|code| configured.contains(&code.to_uppercase()))
            .unwrap_or(false);

        apply_inversion(self.invert, matched)
    }
}
