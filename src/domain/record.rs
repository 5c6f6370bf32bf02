//! Record kinds
//!
//! Ties each location shape to its [`RecordKind`], to the geolocation source
//! call that produces it and to its representation in the cache. Everything
//! generic over location kinds in the application layer goes through here.

use crate::domain::entities::{CachedLocation, CityLocation, CountryLocation};
use crate::domain::error::LookupError;
use crate::domain::ports::GeoSource;
use crate::domain::value_objects::{Lookup, RecordKind};
use std::net::Ipv4Addr;

/// A location shape that can be looked up and cached.
pub trait LocationRecord: Clone + Send + Sync + 'static {
    const KIND: RecordKind;

    /// Query the geolocation source for this kind of record.
    fn fetch(source: &dyn GeoSource, ip: Ipv4Addr) -> Result<Lookup<Self>, LookupError>;

    fn into_cached(self) -> CachedLocation;

    /// Extract the record from a cached value, or `None` if it holds another kind.
    fn from_cached(cached: CachedLocation) -> Option<Self>;
}

impl LocationRecord for CityLocation {
    const KIND: RecordKind = RecordKind::City;

    fn fetch(source: &dyn GeoSource, ip: Ipv4Addr) -> Result<Lookup<Self>, LookupError> {
        source.try_city(ip)
    }

    fn into_cached(self) -> CachedLocation {
        CachedLocation::City(self)
    }

    fn from_cached(cached: CachedLocation) -> Option<Self> {
        match cached {
            CachedLocation::City(location) => Some(location),
            CachedLocation::Country(_) => None,
        }
    }
}

impl LocationRecord for CountryLocation {
    const KIND: RecordKind = RecordKind::Country;

    fn fetch(source: &dyn GeoSource, ip: Ipv4Addr) -> Result<Lookup<Self>, LookupError> {
        source.try_country(ip)
    }

    fn into_cached(self) -> CachedLocation {
        CachedLocation::Country(self)
    }

    fn from_cached(cached: CachedLocation) -> Option<Self> {
        match cached {
            CachedLocation::Country(location) => Some(location),
            CachedLocation::City(_) => None,
        }
    }
}
