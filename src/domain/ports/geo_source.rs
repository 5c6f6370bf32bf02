//! Geolocation Source Port
//!
//! Defines the interface of the authoritative (slow) IP geolocation database.

use crate::domain::entities::{CityLocation, CountryLocation};
use crate::domain::error::LookupError;
use crate::domain::value_objects::Lookup;
use std::net::Ipv4Addr;

/// Authoritative source of location records.
///
/// This is an outbound port that abstracts the geolocation database.
/// Calls may block on I/O; no timeout or retry is imposed by callers.
pub trait GeoSource: Send + Sync {
    /// Resolve the city and state of an address.
    ///
    /// Returns `Lookup::Absent` when the database has no city data for it,
    /// and `LookupError::Source` when the database itself fails.
    fn try_city(&self, ip: Ipv4Addr) -> Result<Lookup<CityLocation>, LookupError>;

    /// Resolve the country of an address.
    fn try_country(&self, ip: Ipv4Addr) -> Result<Lookup<CountryLocation>, LookupError>;
}
