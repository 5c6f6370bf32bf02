//! Domain Entities - Core business objects
//!
//! Location records resolved for an IPv4 address. Records are built once
//! by the geolocation source and never mutated afterwards; the cache stores
//! exact copies of them.

use serde::{Deserialize, Serialize};

/// A city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// English name of the city
    pub name: String,
    /// GeoNames identifier
    pub geo_name_id: u32,
}

impl City {
    pub fn new(name: impl Into<String>, geo_name_id: u32) -> Self {
        Self {
            name: name.into(),
            geo_name_id,
        }
    }
}

/// A state, i.e. the most specific subdivision containing the city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub name: String,
    pub geo_name_id: u32,
    /// ISO 3166-2 subdivision code without the country prefix
    pub iso_code: String,
}

impl State {
    pub fn new(name: impl Into<String>, geo_name_id: u32, iso_code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geo_name_id,
            iso_code: iso_code.into(),
        }
    }
}

/// A country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub geo_name_id: u32,
    /// Whether the country is a member state of the European Union
    pub in_european_union: bool,
    /// ISO 3166-1 alpha-2 code
    pub iso_code: String,
}

impl Country {
    pub fn new(
        name: impl Into<String>,
        geo_name_id: u32,
        in_european_union: bool,
        iso_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            geo_name_id,
            in_european_union,
            iso_code: iso_code.into(),
        }
    }
}

/// City/state result for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityLocation {
    pub city: City,
    pub state: State,
}

impl CityLocation {
    pub fn new(city: City, state: State) -> Self {
        Self { city, state }
    }
}

/// Country result for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryLocation {
    pub country: Country,
}

impl CountryLocation {
    pub fn new(country: Country) -> Self {
        Self { country }
    }
}

/// A location as held by the cache, whatever its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedLocation {
    City(CityLocation),
    Country(CountryLocation),
}
