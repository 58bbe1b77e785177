//! Private and reserved address classification
//!
//! Decides whether an address may be geolocated at all. Private,
//! loopback, link-local and unique-local ranges carry no location data,
//! so they are rejected before any database work. No network I/O.

use std::net::IpAddr;
use std::sync::LazyLock;

use ipnet::{Ipv4Net, Ipv6Net};

/// IPv4 ranges that are never globally routable
static PRIVATE_V4: LazyLock<Vec<Ipv4Net>> = LazyLock::new(|| {
    [
        "10.0.0.0/8",
        "172.16.0.0/12",
        "192.168.0.0/16",
        "127.0.0.0/8",
        "169.254.0.0/16",
    ]
    .iter()
    .map(|net| net.parse().expect("hardcoded CIDR literal"))
    .collect()
});

/// IPv6 loopback, link-local and unique-local ranges
static PRIVATE_V6: LazyLock<Vec<Ipv6Net>> = LazyLock::new(|| {
    ["::1/128", "fe80::/10", "fc00::/7"]
        .iter()
        .map(|net| net.parse().expect("hardcoded CIDR literal"))
        .collect()
});

/// Check whether a textual address is private, reserved or malformed.
///
/// Anything that does not parse as an IPv4/IPv6 literal classifies as
/// private. The caller's reaction to "private" is to skip geolocation,
/// which is also the right outcome for garbage input.
pub fn is_private(address: &str) -> bool {
    match address.parse::<IpAddr>() {
        Ok(ip) => is_private_ip(ip),
        Err(_) => true,
    }
}

/// Check whether a parsed address is in a private or reserved range.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => PRIVATE_V4.iter().any(|net| net.contains(&v4)),
        IpAddr::V6(v6) => PRIVATE_V6.iter().any(|net| net.contains(&v6)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_ipv4_ranges() {
        for address in [
            "10.0.0.1",
            "10.255.255.255",
            "172.16.0.1",
            "172.31.255.255",
            "192.168.0.1",
            "192.168.255.1",
            "127.0.0.1",
            "169.254.1.1",
        ] {
            assert!(is_private(address), "{address} should be private");
        }
    }

    #[test]
    fn test_private_ipv6_ranges() {
        for address in ["::1", "fe80::1", "febf::1", "fc00::1", "fd00::1"] {
            assert!(is_private(address), "{address} should be private");
        }
    }

    #[test]
    fn test_public_addresses() {
        for address in [
            "8.8.8.8",
            "1.1.1.1",
            "172.15.255.255",
            "172.32.0.0",
            "2001:db8::1",
            "2001:4860:4860::8888",
        ] {
            assert!(!is_private(address), "{address} should be public");
        }
    }

    #[test]
    fn test_malformed_input_classifies_as_private() {
        for address in [
            "",
            "not-an-ip",
            "999.1.1.1",
            "1.2.3",
            "1.2.3.4.5",
            " 8.8.8.8",
            "8.8.8.8:443",
            "fe80:::1",
        ] {
            assert!(is_private(address), "{address:?} should fail closed");
        }
    }

    #[test]
    fn test_is_private_ip_matches_string_form() {
        let ip: IpAddr = "192.168.1.1".parse().unwrap();
        assert!(is_private_ip(ip));

        let ip: IpAddr = "9.9.9.9".parse().unwrap();
        assert!(!is_private_ip(ip));
    }
}
