//! Visitor geolocation module
//!
//! Resolves the client address for a request, filters private and
//! reserved ranges, and looks the address up in a pluggable geolocation
//! data source (MaxMind GeoLite2/GeoIP2 MMDB by default).
//!
//! Lookup results are never cached here; callers own that decision.

pub mod classifier;
pub mod ip_extractor;
pub mod maxmind;
pub mod models;
pub mod provider;
pub mod service;

// Re-export commonly used types
pub use classifier::{is_private, is_private_ip};
pub use ip_extractor::resolve_client_ip;
pub use maxmind::MaxMindProvider;
pub use models::GeoLocationRecord;
pub use provider::{GeoLocationProvider, ProviderError, ProviderResult};
pub use service::GeolocationService;
