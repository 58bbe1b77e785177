//! Data models for geolocation results

use serde::{Deserialize, Serialize};

/// Geographic location information derived from an IP address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocationRecord {
    /// ISO 3166-1 alpha-2 country code (e.g., "US", "DE")
    pub country_code: Option<String>,

    /// Country name
    pub country_name: Option<String>,

    /// Continent code (AF, AN, AS, EU, NA, OC, SA)
    pub continent_code: Option<String>,

    /// Continent name
    pub continent_name: Option<String>,

    /// Latitude in decimal degrees
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees
    pub longitude: Option<f64>,

    /// City name
    pub city: Option<String>,

    /// Postal code
    pub postal_code: Option<String>,

    /// ISO code of the most specific subdivision (state/province)
    pub region_code: Option<String>,

    /// Name of the most specific subdivision
    pub region_name: Option<String>,
}

impl GeoLocationRecord {
    /// Check if the record carries usable coordinates.
    ///
    /// Both latitude and longitude must be present. (0.0, 0.0) is the
    /// placeholder some databases emit for an unknown location and
    /// counts as "no coordinates".
    pub fn has_coordinates(&self) -> bool {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => !(latitude == 0.0 && longitude == 0.0),
            _ => false,
        }
    }
}
