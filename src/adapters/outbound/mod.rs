mod dashmap_location_cache;
mod maxmind_geo_source;
mod redis_location_cache;

pub use dashmap_location_cache::DashMapLocationCache;
pub use maxmind_geo_source::MaxMindGeoSource;
pub use redis_location_cache::RedisLocationCache;
