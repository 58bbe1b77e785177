//! Geolocation lookups composed over address resolution and filtering

use std::net::IpAddr;
use std::sync::Arc;

use http::HeaderMap;

use crate::config::{Config, ProxyConfig};

use super::classifier;
use super::ip_extractor;
use super::maxmind::MaxMindProvider;
use super::models::GeoLocationRecord;
use super::provider::{GeoLocationProvider, ProviderResult};

/// Geolocation lookup service.
///
/// Resolves the client address under the configured trust policy,
/// filters private and reserved addresses, and delegates to the
/// provider. Provider errors pass through untranslated.
pub struct GeolocationService {
    provider: Arc<dyn GeoLocationProvider>,
    proxy: ProxyConfig,
}

impl GeolocationService {
    pub fn new(provider: Arc<dyn GeoLocationProvider>, proxy: ProxyConfig) -> Self {
        Self { provider, proxy }
    }

    /// Wire up a service over the MaxMind provider from configuration
    pub fn from_config(config: &Config) -> Self {
        let path = config.geoip.database_path.clone().unwrap_or_default();
        Self::new(Arc::new(MaxMindProvider::new(path)), config.proxy.clone())
    }

    /// Look up the location for a textual address.
    ///
    /// Private, reserved and malformed addresses resolve to `Ok(None)`
    /// without touching the provider.
    pub fn locate(&self, address: &str) -> ProviderResult<Option<GeoLocationRecord>> {
        if classifier::is_private(address) {
            return Ok(None);
        }

        // is_private() already rejected anything that does not parse
        let Ok(ip) = address.parse::<IpAddr>() else {
            return Ok(None);
        };

        self.provider.lookup(ip)
    }

    /// Look up the location for a request's client address.
    ///
    /// Returns `Ok(None)` when no address could be resolved or the
    /// resolved address is private.
    pub fn locate_for_request(
        &self,
        headers: &HeaderMap,
        remote_addr: Option<&str>,
    ) -> ProviderResult<Option<GeoLocationRecord>> {
        let Some(ip) = self.client_ip(headers, remote_addr) else {
            return Ok(None);
        };

        if classifier::is_private_ip(ip) {
            return Ok(None);
        }

        self.provider.lookup(ip)
    }

    /// Client address for a request under this service's trust policy
    pub fn client_ip(&self, headers: &HeaderMap, remote_addr: Option<&str>) -> Option<IpAddr> {
        ip_extractor::resolve_client_ip(headers, remote_addr, &self.proxy)
    }

    /// Whether the underlying provider is available
    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}
