use std::net::IpAddr;

use thiserror::Error;

use super::models::GeoLocationRecord;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backing data source is missing or unreadable
    #[error("geolocation database not available at {0}")]
    Unavailable(String),
    /// The backing data source exists but cannot be read as a database
    #[error("invalid geolocation database")]
    Corrupt(#[source] anyhow::Error),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Capability interface over a geolocation data source.
///
/// Implementations may lazily open and internally cache a handle to
/// their backing source, but are stateless from the caller's view.
pub trait GeoLocationProvider: Send + Sync {
    /// Look up the location record for an IP address.
    ///
    /// Returns `Ok(None)` when the address is not present in the data
    /// source; that is a normal outcome, not an error. This is the only
    /// operation that surfaces `Unavailable`/`Corrupt` — the narrow
    /// accessors below report both as `None`.
    fn lookup(&self, ip: IpAddr) -> ProviderResult<Option<GeoLocationRecord>>;

    /// Whether the backing data source is present and readable
    fn is_available(&self) -> bool;

    /// ISO 3166-1 alpha-2 country code for an IP address
    fn country_code(&self, ip: IpAddr) -> Option<String> {
        self.lookup(ip).ok().flatten().and_then(|record| record.country_code)
    }

    /// Country name for an IP address
    fn country_name(&self, ip: IpAddr) -> Option<String> {
        self.lookup(ip).ok().flatten().and_then(|record| record.country_name)
    }

    /// Continent code (AF, AN, AS, EU, NA, OC, SA) for an IP address
    fn continent_code(&self, ip: IpAddr) -> Option<String> {
        self.lookup(ip).ok().flatten().and_then(|record| record.continent_code)
    }

    /// Latitude for an IP address
    fn latitude(&self, ip: IpAddr) -> Option<f64> {
        self.lookup(ip).ok().flatten().and_then(|record| record.latitude)
    }

    /// Longitude for an IP address
    fn longitude(&self, ip: IpAddr) -> Option<f64> {
        self.lookup(ip).ok().flatten().and_then(|record| record.longitude)
    }

    /// City name for an IP address
    fn city(&self, ip: IpAddr) -> Option<String> {
        self.lookup(ip).ok().flatten().and_then(|record| record.city)
    }
}
