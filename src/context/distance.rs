//! Distance-from-point predicate

use std::sync::Arc;

use http::HeaderMap;

use crate::geoip::{GeoLocationRecord, GeolocationService};

use super::{apply_inversion, resolve_location, ContextSettings};

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Matches when the visitor is within a configured radius of a point.
///
/// The center point and radius come from the host configuration as
/// numeric strings; any missing or out-of-range value disables the
/// predicate without a lookup. The boundary is inclusive: a visitor at
/// exactly the configured radius matches.
pub struct DistanceContext {
    service: Arc<GeolocationService>,
    invert: bool,
}

impl DistanceContext {
    /// Settings key for the center latitude in decimal degrees
    pub const SETTING_LATITUDE: &'static str = "latitude";

    /// Settings key for the center longitude in decimal degrees
    pub const SETTING_LONGITUDE: &'static str = "longitude";

    /// Settings key for the radius in kilometers
    pub const SETTING_RADIUS: &'static str = "radius";

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
        let Some(center) = Center::from_settings(settings) else {
            return apply_inversion(self.invert, false);
        };

        let matched = resolve_location(&self.service, headers, remote_addr)
            .filter(GeoLocationRecord::has_coordinates)
            .and_then(|location| Some((location.latitude?, location.longitude?)))
            .map(|(latitude, longitude)| {
                let distance =
                    haversine_distance(center.latitude, center.longitude, latitude, longitude);
                distance <= center.radius
            })
            .unwrap_or(false);

        apply_inversion(self.invert, matched)
    }
}

/// Validated center point and radius
struct Center {
    latitude: f64,
    longitude: f64,
    radius: f64,
}

impl Center {
    fn from_settings(settings: &dyn ContextSettings) -> Option<Self> {
        let latitude = parse_in_range(
            &settings.value(DistanceContext::SETTING_LATITUDE),
            -90.0,
            90.0,
        )?;
        let longitude = parse_in_range(
            &settings.value(DistanceContext::SETTING_LONGITUDE),
            -180.0,
            180.0,
        )?;
        let radius = parse_in_range(
            &settings.value(DistanceContext::SETTING_RADIUS),
            0.0,
            f64::INFINITY,
        )?;

        Some(Self {
            latitude,
            longitude,
            radius,
        })
    }
}

/// Parse a finite numeric setting within an inclusive range.
fn parse_in_range(raw: &str, min: f64, max: f64) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && value >= min && value <= max).then_some(value)
}

/// Great-circle distance between two points in kilometers.
///
/// Haversine formula over a sphere with the mean Earth radius. The
/// distance between a point and itself is exactly 0.0, and the formula
/// is symmetric in its two points.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
