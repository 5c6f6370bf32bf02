//! ip-geolocation Library
//!
//! Resolves the city/state or country of IPv4 addresses through a
//! cache-aside repository in front of a MaxMind database. Exposed as a
//! library for integration tests and embedding.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use application::{HybridLocationRepository, LocationFacade, LocationService};
pub use config::load_config;
pub use domain::entities::{City, CityLocation, Country, CountryLocation, State};
pub use domain::error::{ErrorKind, LookupError};
pub use domain::ports::{GeoSource, LocationCache, LocationRepository};
pub use domain::value_objects::{CacheKey, Lookup, RecordKind};
