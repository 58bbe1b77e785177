use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub geoip: GeoIpConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoIpConfig {
    /// Path to a MaxMind City .mmdb file
    /// If None, the provider reports unavailable and lookups fail safe
    pub database_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Whether forwarding headers from upstream proxies are trusted
    pub trust_proxy_headers: bool,

    /// Header names to check for the client address, in order of priority
    pub proxy_headers: Vec<String>,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            trust_proxy_headers: false,
            proxy_headers: Self::default_proxy_headers(),
        }
    }
}

impl ProxyConfig {
    fn default_proxy_headers() -> Vec<String> {
        vec!["x-forwarded-for".to_string(), "x-real-ip".to_string()]
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_path = std::env::var("GEOIP_DATABASE_PATH").ok();

        let trust_proxy_headers = std::env::var("TRUST_PROXY_HEADERS")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        let proxy_headers = match std::env::var("PROXY_HEADERS") {
            Ok(raw) => {
                let headers: Vec<String> = raw
                    .split(',')
                    .map(|name| name.trim().to_lowercase())
                    .filter(|name| !name.is_empty())
                    .collect();

                if headers.is_empty() {
                    tracing::warn!(
                        "PROXY_HEADERS is set but contains no header names, using the default header order"
                    );
                    ProxyConfig::default_proxy_headers()
                } else {
                    headers
                }
            }
            Err(_) => ProxyConfig::default_proxy_headers(),
        };

        Ok(Config {
            geoip: GeoIpConfig { database_path },
            proxy: ProxyConfig {
                trust_proxy_headers,
                proxy_headers,
            },
        })
    }
}
