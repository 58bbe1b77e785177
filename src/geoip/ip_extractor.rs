//! Client IP extraction from HTTP headers with trust validation
//!
//! Determines the single address representing the requester. Forwarding
//! headers are only consulted when the deployment explicitly trusts its
//! proxy chain; otherwise the direct connection address is used.

use std::net::IpAddr;

use http::HeaderMap;
use tracing::debug;

use crate::config::ProxyConfig;

/// Extract the originating client address for a request.
///
/// With proxy trust enabled, the configured headers are tried in order
/// and the first one carrying a syntactically valid address wins. The
/// first comma-separated token is taken as the client, per the
/// forwarding-chain convention (closest to the visitor). Without a
/// usable header the direct connection address is used.
///
/// Validity here is purely syntactic. Private addresses are accepted so
/// the direct-connection fallback works in development setups; the
/// private/public decision belongs to the caller.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    remote_addr: Option<&str>,
    config: &ProxyConfig,
) -> Option<IpAddr> {
    if config.trust_proxy_headers {
        for name in &config.proxy_headers {
            if let Some(ip) = candidate_from_header(headers, name.as_str()) {
                return Some(ip);
            }
        }
    }

    let remote = remote_addr?;
    match remote.parse::<IpAddr>() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!("Connection address {:?} is not a valid IP literal", remote);
            None
        }
    }
}

/// First comma-separated token of a header, if it is a valid IP literal
fn candidate_from_header(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    let value = headers.get(name)?.to_str().ok()?;
    let first = value.split(',').next()?.trim();

    if first.is_empty() {
        return None;
    }

    match first.parse::<IpAddr>() {
        Ok(ip) => Some(ip),
        Err(_) => {
            debug!("Ignoring header {} with invalid candidate {:?}", name, first);
            None
        }
    }
}
