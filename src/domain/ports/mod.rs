mod geo_source;
mod location_cache;
mod location_repository;

pub use geo_source::GeoSource;
pub use location_cache::LocationCache;
pub use location_repository::LocationRepository;
