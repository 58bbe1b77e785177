//! Country membership predicate

use std::sync::Arc;

use http::HeaderMap;

use crate::geoip::GeolocationService;

use super::{apply_inversion, parse_code_list, resolve_location, ContextSettings};

/// Matches when the visitor's country is in a configured list.
///
/// Country codes are ISO 3166-1 alpha-2 (e.g., DE, US, FR), compared
/// case-insensitively and exactly. An empty list never matches, before
/// any lookup work is done.
pub struct CountryContext {
    service: Arc<GeolocationService>,
    invert: bool,
}

impl CountryContext {
    /// Settings key holding the comma-separated country code list
    pub const SETTING_COUNTRIES: &'static str = "countries";

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
        let configured = parse_code_list(&settings.value(Self::SETTING_COUNTRIES));
        if configured.is_empty() {
            return apply_inversion(self.invert, false);
        }

        let matched = resolve_location(&self.service, headers, remote_addr)
            .and_then(|location| location.country_code)
            .map(|code| configured.contains(&code.to_uppercase()))
            .unwrap_or(false);

        apply_inversion(self.invert, matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use crate::geoip::provider::{GeoLocationProvider, ProviderError, ProviderResult};
    use crate::geoip::GeoLocationRecord;
    use std::collections::HashMap;
    use std::net::IpAddr;

    struct FixedProvider(Option<GeoLocationRecord>);

    impl GeoLocationProvider for FixedProvider {
        fn lookup(&self, _ip: IpAddr) -> ProviderResult<Option<GeoLocationRecord>> {
            Ok(self.0.clone())
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    struct FailingProvider;

    impl GeoLocationProvider for FailingProvider {
        fn lookup(&self, _ip: IpAddr) -> ProviderResult<Option<GeoLocationRecord>> {
            Err(ProviderError::Unavailable("/missing.mmdb".to_string()))
        }

        fn is_available(&self) -> bool {
            false
        }
    }

    fn service_detecting(country_code: Option<&str>) -> Arc<GeolocationService> {
        let record = country_code.map(|code| GeoLocationRecord {
            country_code: Some(code.to_string()),
            ..Default::default()
        });
        Arc::new(GeolocationService::new(
            Arc::new(FixedProvider(record)),
            ProxyConfig::default(),
        ))
    }

    fn settings(countries: &str) -> HashMap<String, String> {
        HashMap::from([(
            CountryContext::SETTING_COUNTRIES.to_string(),
            countries.to_string(),
        )])
    }

    #[test]
    fn test_matches_configured_country_case_insensitively() {
        let context = CountryContext::new(service_detecting(Some("de")), false);
        let headers = HeaderMap::new();

        assert!(context.matches(&settings("DE, US, FR"), &headers, Some("8.8.8.8")));
        assert!(context.matches(&settings(" de , us ,fr "), &headers, Some("8.8.8.8")));
    }

    #[test]
    fn test_no_match_for_other_country() {
        let context = CountryContext::new(service_detecting(Some("gb")), false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings("DE, US, FR"), &headers, Some("8.8.8.8")));
    }

    #[test]
    fn test_no_partial_code_matching() {
        let context = CountryContext::new(service_detecting(Some("DE")), false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings("DEU"), &headers, Some("8.8.8.8")));
    }

    #[test]
    fn test_empty_configuration_never_matches() {
        let context = CountryContext::new(service_detecting(Some("DE")), false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings(""), &headers, Some("8.8.8.8")));
        assert!(!context.matches(&settings(" , ,"), &headers, Some("8.8.8.8")));
        assert!(!context.matches(
            &HashMap::<String, String>::new(),
            &headers,
            Some("8.8.8.8")
        ));
    }

    #[test]
    fn test_private_address_never_matches() {
        let context = CountryContext::new(service_detecting(Some("DE")), false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings("DE"), &headers, Some("192.168.1.1")));
    }

    #[test]
    fn test_unresolved_address_never_matches() {
        let context = CountryContext::new(service_detecting(Some("DE")), false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings("DE"), &headers, None));
    }

    #[test]
    fn test_missing_country_code_never_matches() {
        let context = CountryContext::new(service_detecting(None), false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings("DE"), &headers, Some("8.8.8.8")));
    }

    #[test]
    fn test_provider_failure_evaluates_to_false() {
        let service = Arc::new(GeolocationService::new(
            Arc::new(FailingProvider),
            ProxyConfig::default(),
        ));
        let context = CountryContext::new(service, false);
        let headers = HeaderMap::new();

        assert!(!context.matches(&settings("DE"), &headers, Some("8.8.8.8")));
    }

    #[test]
    fn test_inversion_negates_final_result_only() {
        let headers = HeaderMap::new();

        let inverted = CountryContext::new(service_detecting(Some("DE")), true);
        assert!(!inverted.matches(&settings("DE"), &headers, Some("8.8.8.8")));
        assert!(inverted.matches(&settings("GB"), &headers, Some("8.8.8.8")));

        // Intermediate failures still collapse to false first, then invert
        assert!(inverted.matches(&settings(""), &headers, Some("8.8.8.8")));
        assert!(inverted.matches(&settings("DE"), &headers, Some("192.168.1.1")));
    }
}
