//! MaxMind GeoLite2/GeoIP2 MMDB provider
//!
//! Adapts a memory-mapped MaxMind City database to the
//! [`GeoLocationProvider`] capability. The file is opened lazily on the
//! first lookup and the handle is reused for the provider's lifetime;
//! reads after open are lock-free and safe for concurrent use.

use std::fs::{self, File};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use maxminddb::{geoip2, MaxMindDbError, Mmap, Reader};
use tracing::trace;

use super::models::GeoLocationRecord;
use super::provider::{GeoLocationProvider, ProviderError, ProviderResult};

/// GeoLocationProvider backed by a MaxMind City database file
pub struct MaxMindProvider {
    path: PathBuf,
    reader: OnceLock<Result<Reader<Mmap>, Arc<MaxMindDbError>>>,
}

impl MaxMindProvider {
    /// Create a provider for the database at `path`.
    ///
    /// The file is not opened until the first lookup.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: OnceLock::new(),
        }
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the reader on first use.
    ///
    /// Every caller observes the same handle, or the same failure when
    /// the file cannot be opened as a database.
    fn reader(&self) -> ProviderResult<&Reader<Mmap>> {
        let slot = self
            .reader
            .get_or_init(|| unsafe { Reader::open_mmap(&self.path) }.map_err(Arc::new));

        match slot {
            Ok(reader) => Ok(reader),
            Err(source) => Err(ProviderError::Corrupt(anyhow::Error::new(Arc::clone(
                source,
            )))),
        }
    }

    fn record_from_city(city: &geoip2::City) -> GeoLocationRecord {
        let subdivision = city.subdivisions.last();

        GeoLocationRecord {
            country_code: city.country.iso_code.map(|s| s.to_string()),
            country_name: city.country.names.english.map(|s| s.to_string()),
            continent_code: city.continent.code.map(|s| s.to_string()),
            continent_name: city.continent.names.english.map(|s| s.to_string()),
            latitude: city.location.latitude,
            longitude: city.location.longitude,
            city: city.city.names.english.map(|s| s.to_string()),
            postal_code: city.postal.code.map(|s| s.to_string()),
            region_code: subdivision.and_then(|s| s.iso_code).map(|s| s.to_string()),
            region_name: subdivision
                .and_then(|s| s.names.english)
                .map(|s| s.to_string()),
        }
    }
}

impl GeoLocationProvider for MaxMindProvider {
    fn lookup(&self, ip: IpAddr) -> ProviderResult<Option<GeoLocationRecord>> {
        if !self.is_available() {
            return Err(ProviderError::Unavailable(self.path.display().to_string()));
        }

        let reader = self.reader()?;

        let result = reader
            .lookup(ip)
            .map_err(|e| ProviderError::Corrupt(anyhow::Error::new(e)))?;

        let Some(city) = result
            .decode::<geoip2::City>()
            .map_err(|e| ProviderError::Corrupt(anyhow::Error::new(e)))?
        else {
            return Ok(None);
        };

        let record = Self::record_from_city(&city);
        trace!(
            "MaxMind lookup for {}: country={:?}, city={:?}",
            ip,
            record.country_code,
            record.city
        );

        Ok(Some(record))
    }

    fn is_available(&self) -> bool {
        match fs::metadata(&self.path) {
            Ok(meta) => meta.is_file() && File::open(&self.path).is_ok(),
            Err(_) => false,
        }
    }
}
