//! ip-geolocation - IPv4 geolocation service
//!
//! This is the composition root that wires together all the components.

use anyhow::Context;
use ip_geolocation::adapters::inbound::ApiServer;
use ip_geolocation::adapters::outbound::{
    DashMapLocationCache, MaxMindGeoSource, RedisLocationCache,
};
use ip_geolocation::application::LocationFacade;
use ip_geolocation::config::{load_config, CacheBackend};
use ip_geolocation::domain::ports::{GeoSource, LocationCache};
use ip_geolocation::infrastructure::{discover_public_ip, shutdown_signal, ShutdownController};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting ip-geolocation listen={} cache={:?}",
        cfg.listen_addr,
        cfg.cache_backend
    );

    // ===== COMPOSITION ROOT =====

    // 1. Outbound adapters

    // Geolocation source (MaxMind)
    let maxmind = MaxMindGeoSource::from_file(&cfg.geoip_path)
        .with_context(|| format!("failed to load GeoIP DB from {}", cfg.geoip_path))?;
    tracing::info!(
        "GeoIP DB loaded from {} ({})",
        cfg.geoip_path,
        maxmind.database_type()
    );
    let source: Arc<dyn GeoSource> = Arc::new(maxmind);

    // Location cache
    let cache: Arc<dyn LocationCache> = match cfg.cache_backend {
        CacheBackend::Memory => Arc::new(DashMapLocationCache::new()),
        CacheBackend::Redis => {
            tracing::info!("using redis cache at {}:{}", cfg.redis_host, cfg.redis_port);
            Arc::new(RedisLocationCache::new(&cfg.redis_host, cfg.redis_port)?)
        }
    };

    // Host public IP
    let host_public_ip = match cfg.host_public_ip {
        Some(ip) => ip,
        None => discover_public_ip(&cfg.public_ip_url)
            .await
            .context("host public IP is not configured and could not be discovered")?,
    };
    tracing::info!("host public IP is {}", host_public_ip);

    // 2. Application facade
    let facade = Arc::new(LocationFacade::from_ports(cache, source, host_public_ip));

    // 3. Inbound adapter
    let shutdown = ShutdownController::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let server = ApiServer::new(cfg.listen_addr.clone(), facade);
    server.run(shutdown).await
}
