use crate::infrastructure::public_ip::DEFAULT_PUBLIC_IP_URL;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Where resolved locations are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process DashMap
    Memory,
    /// Shared Redis server
    Redis,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => anyhow::bail!("unknown cache backend: {}", other),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub geoip_path: String,
    /// Public IP of this host; discovered at startup when unset
    pub host_public_ip: Option<Ipv4Addr>,
    pub public_ip_url: String,
    pub cache_backend: CacheBackend,
    pub redis_host: String,
    pub redis_port: u16,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            geoip_path: "GeoLite2-City.mmdb".to_string(),
            host_public_ip: None,
            public_ip_url: DEFAULT_PUBLIC_IP_URL.to_string(),
            cache_backend: CacheBackend::Memory,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr = std::env::var("GEOLOCATION_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let geoip_path = std::env::var("GEOLOCATION_GEOIP_PATH")
        .unwrap_or_else(|_| "GeoLite2-City.mmdb".to_string());

    // A configured host IP must be valid: it is looked up as-is on every
    // request that omits the address.
    let host_public_ip = match std::env::var("GEOLOCATION_HOST_PUBLIC_IP") {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().parse::<Ipv4Addr>().map_err(|_| {
            anyhow::anyhow!("GEOLOCATION_HOST_PUBLIC_IP is not an IPv4 address: {}", v)
        })?),
        _ => None,
    };

    let public_ip_url = std::env::var("GEOLOCATION_PUBLIC_IP_URL")
        .unwrap_or_else(|_| DEFAULT_PUBLIC_IP_URL.to_string());

    let cache_backend = match std::env::var("GEOLOCATION_CACHE_BACKEND") {
        Ok(v) => v.parse::<CacheBackend>()?,
        Err(_) => CacheBackend::Memory,
    };

    let redis_host = std::env::var("REDIS_HOST")
        .unwrap_or_else(|_| "localhost".to_string());

    let redis_port = std::env::var("REDIS_PORT")
        .unwrap_or_else(|_| "6379".to_string())
        .parse()
        .unwrap_or(6379);

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        listen_addr,
        geoip_path,
        host_public_ip,
        public_ip_url,
        cache_backend,
        redis_host,
        redis_port,
        debug,
    })
}
