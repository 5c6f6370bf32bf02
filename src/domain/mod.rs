//! Domain Layer
//!
//! Location records, lookup errors, the ports the application layer talks
//! to and pure domain services. No I/O happens here.

pub mod entities;
pub mod error;
pub mod ports;
pub mod record;
pub mod services;
pub mod value_objects;

pub use entities::{CachedLocation, City, CityLocation, Country, CountryLocation, State};
pub use error::{ErrorKind, LookupError};
pub use record::LocationRecord;
pub use value_objects::{CacheKey, Lookup, RecordKind};
