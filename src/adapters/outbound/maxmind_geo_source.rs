//! MaxMind Geolocation Source
//!
//! Implements GeoSource using a MaxMind GeoIP2/GeoLite2 City database.

use crate::domain::entities::{City, CityLocation, Country, CountryLocation, State};
use crate::domain::error::LookupError;
use crate::domain::ports::GeoSource;
use crate::domain::value_objects::Lookup;
use maxminddb::{MaxMindDBError, Reader};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

/// Locale used for city, subdivision and country names.
const NAME_LOCALE: &str = "en";

#[derive(Debug, Default, Deserialize)]
struct NamedBlock {
    geoname_id: Option<u32>,
    iso_code: Option<String>,
    is_in_european_union: Option<bool>,
    names: Option<BTreeMap<String, String>>,
}

impl NamedBlock {
    fn name(&self) -> String {
        self.names
            .as_ref()
            .and_then(|names| names.get(NAME_LOCALE))
            .cloned()
            .unwrap_or_default()
    }

    fn iso_code(&self) -> String {
        self.iso_code.clone().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CityResponse {
    city: Option<NamedBlock>,
    subdivisions: Option<Vec<NamedBlock>>,
}

#[derive(Debug, Default, Deserialize)]
struct CountryResponse {
    country: Option<NamedBlock>,
}

impl CityResponse {
    /// Build the domain record. The state is the most specific subdivision.
    fn into_location(self) -> Lookup<CityLocation> {
        let Some(city) = self.city else {
            return Lookup::Absent;
        };

        let state = self
            .subdivisions
            .as_ref()
            .and_then(|subdivisions| subdivisions.last())
            .map(|s| State::new(s.name(), s.geoname_id.unwrap_or_default(), s.iso_code()))
            .unwrap_or_default();

        Lookup::Found(CityLocation::new(
            City::new(city.name(), city.geoname_id.unwrap_or_default()),
            state,
        ))
    }
}

impl CountryResponse {
    fn into_location(self) -> Lookup<CountryLocation> {
        self.country
            .map(|c| {
                CountryLocation::new(Country::new(
                    c.name(),
                    c.geoname_id.unwrap_or_default(),
                    c.is_in_european_union.unwrap_or(false),
                    c.iso_code(),
                ))
            })
            .into()
    }
}

/// MaxMind geolocation source.
///
/// The whole database is read into memory once; lookups never touch disk.
pub struct MaxMindGeoSource {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoSource {
    /// Load a GeoIP database from a file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Load a GeoIP database from raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let reader = Reader::from_source(bytes)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }

    /// Database type from the metadata, e.g. `GeoLite2-City`.
    pub fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }

    fn lookup<T: DeserializeOwned>(&self, ip: Ipv4Addr) -> Result<Option<T>, LookupError> {
        match self.reader.lookup::<T>(IpAddr::V4(ip)) {
            Ok(record) => Ok(Some(record)),
            Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
            Err(e) => {
                tracing::error!("unable to get location for IP {}: {}", ip, e);
                Err(LookupError::Source(e.to_string()))
            }
        }
    }
}

impl GeoSource for MaxMindGeoSource {
    fn try_city(&self, ip: Ipv4Addr) -> Result<Lookup<CityLocation>, LookupError> {
        let resp: Option<CityResponse> = self.lookup(ip)?;
        Ok(resp.map_or(Lookup::Absent, CityResponse::into_location))
    }

    fn try_country(&self, ip: Ipv4Addr) -> Result<Lookup<CountryLocation>, LookupError> {
        let resp: Option<CountryResponse> = self.lookup(ip)?;
        Ok(resp.map_or(Lookup::Absent, CountryResponse::into_location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, geoname_id: u32, iso_code: Option<&str>) -> NamedBlock {
        let mut names = BTreeMap::new();
        names.insert("en".to_string(), name.to_string());
        names.insert("it".to_string(), format!("{} (it)", name));
        NamedBlock {
            geoname_id: Some(geoname_id),
            iso_code: iso_code.map(str::to_string),
            is_in_european_union: None,
            names: Some(names),
        }
    }

    // ===== City Conversion Tests =====

    #[test]
    fn test_city_uses_most_specific_subdivision() {
        let resp = CityResponse {
            city: Some(named("Milan", 3173435, None)),
            subdivisions: Some(vec![
                named("Lombardy", 3174618, Some("25")),
                named("Milan", 3173434, Some("MI")),
            ]),
        };

        assert_eq!(
            resp.into_location(),
            Lookup::Found(CityLocation::new(
                City::new("Milan", 3173435),
                State::new("Milan", 3173434, "MI"),
            ))
        );
    }

    #[test]
    fn test_city_without_city_block_is_absent() {
        let resp = CityResponse {
            city: None,
            subdivisions: Some(vec![named("Lombardy", 3174618, Some("25"))]),
        };

        assert_eq!(resp.into_location(), Lookup::Absent);
    }

    #[test]
    fn test_city_without_subdivisions_has_empty_state() {
        let resp = CityResponse {
            city: Some(named("Monaco", 2993458, None)),
            subdivisions: None,
        };

        let Lookup::Found(location) = resp.into_location() else {
            panic!("expected a city location");
        };
        assert_eq!(location.city, City::new("Monaco", 2993458));
        assert_eq!(location.state, State::default());
    }

    #[test]
    fn test_city_without_english_name() {
        let mut names = BTreeMap::new();
        names.insert("de".to_string(), "Mailand".to_string());
        let resp = CityResponse {
            city: Some(NamedBlock {
                geoname_id: Some(3173435),
                names: Some(names),
                ..Default::default()
            }),
            subdivisions: None,
        };

        let location = resp.into_location().into_option().unwrap();
        assert_eq!(location.city.name, "");
        assert_eq!(location.city.geo_name_id, 3173435);
    }

    // ===== Country Conversion Tests =====

    #[test]
    fn test_country_conversion() {
        let mut block = named("Italy", 3175395, Some("IT"));
        block.is_in_european_union = Some(true);
        let resp = CountryResponse {
            country: Some(block),
        };

        assert_eq!(
            resp.into_location(),
            Lookup::Found(CountryLocation::new(Country::new(
                "Italy", 3175395, true, "IT"
            )))
        );
    }

    #[test]
    fn test_country_eu_flag_defaults_to_false() {
        let resp = CountryResponse {
            country: Some(named("United States", 6252001, Some("US"))),
        };

        let location = resp.into_location().into_option().unwrap();
        assert!(!location.country.in_european_union);
        assert_eq!(location.country.iso_code, "US");
    }

    #[test]
    fn test_country_without_country_block_is_absent() {
        assert_eq!(CountryResponse::default().into_location(), Lookup::Absent);
    }

    // ===== Reader Tests =====

    /// Writes tiny IPv4 MaxMind databases (24-bit records) for tests.
    mod test_db {
        use std::net::Ipv4Addr;

        pub enum Value {
            Str(&'static str),
            U16(u16),
            U32(u32),
            U64(u64),
            Bool(bool),
            Map(Vec<(&'static str, Value)>),
            Array(Vec<Value>),
        }

        fn control(out: &mut Vec<u8>, type_num: u8, size: usize) {
            assert!(size < 29);
            if type_num <= 7 {
                out.push((type_num << 5) | size as u8);
            } else {
                out.push(size as u8);
                out.push(type_num - 7);
            }
        }

        fn uint(out: &mut Vec<u8>, type_num: u8, value: u64) {
            let bytes = value.to_be_bytes();
            let skip = bytes.iter().take_while(|b| **b == 0).count();
            control(out, type_num, bytes.len() - skip);
            out.extend_from_slice(&bytes[skip..]);
        }

        impl Value {
            fn encode(&self, out: &mut Vec<u8>) {
                match self {
                    Value::Str(s) => {
                        control(out, 2, s.len());
                        out.extend_from_slice(s.as_bytes());
                    }
                    Value::U16(v) => uint(out, 5, u64::from(*v)),
                    Value::U32(v) => uint(out, 6, u64::from(*v)),
                    Value::U64(v) => uint(out, 9, *v),
                    Value::Bool(b) => control(out, 14, usize::from(*b)),
                    Value::Map(pairs) => {
                        control(out, 7, pairs.len());
                        for (key, value) in pairs {
                            Value::Str(*key).encode(out);
                            value.encode(out);
                        }
                    }
                    Value::Array(items) => {
                        control(out, 11, items.len());
                        for item in items {
                            item.encode(out);
                        }
                    }
                }
            }
        }

        #[derive(Clone, Copy)]
        enum Slot {
            Empty,
            Node(usize),
            Data(usize),
        }

        /// Build a database mapping each `(network, prefix_len)` to its record.
        pub fn build(networks: Vec<(Ipv4Addr, u8, Value)>) -> Vec<u8> {
            let mut nodes: Vec<[Slot; 2]> = vec![[Slot::Empty; 2]];
            // Keep real records off offset 0
            let mut data = Vec::new();
            Value::Map(Vec::new()).encode(&mut data);

            for (network, prefix_len, record) in networks {
                let offset = data.len();
                record.encode(&mut data);

                let bits = u32::from(network);
                let mut node = 0;
                for i in 0..prefix_len {
                    let bit = ((bits >> (31 - u32::from(i))) & 1) as usize;
                    if i + 1 == prefix_len {
                        nodes[node][bit] = Slot::Data(offset);
                        break;
                    }
                    node = match nodes[node][bit] {
                        Slot::Node(next) => next,
                        _ => {
                            nodes.push([Slot::Empty; 2]);
                            let next = nodes.len() - 1;
                            nodes[node][bit] = Slot::Node(next);
                            next
                        }
                    };
                }
            }

            let node_count = nodes.len();
            let mut out = Vec::new();
            for node in &nodes {
                for slot in node {
                    let record = match *slot {
                        Slot::Empty => node_count,
                        Slot::Node(next) => next,
                        Slot::Data(offset) => node_count + 16 + offset,
                    };
                    out.extend_from_slice(&(record as u32).to_be_bytes()[1..]);
                }
            }
            out.extend_from_slice(&[0u8; 16]);
            out.extend_from_slice(&data);
            out.extend_from_slice(b"\xab\xcd\xefMaxMind.com");
            Value::Map(vec![
                ("binary_format_major_version", Value::U16(2)),
                ("binary_format_minor_version", Value::U16(0)),
                ("build_epoch", Value::U64(1_700_000_000)),
                ("database_type", Value::Str("GeoLite2-City")),
                ("description", Value::Map(vec![("en", Value::Str("test"))])),
                ("ip_version", Value::U16(4)),
                ("languages", Value::Array(vec![Value::Str("en")])),
                ("node_count", Value::U32(node_count as u32)),
                ("record_size", Value::U16(24)),
            ])
            .encode(&mut out);
            out
        }
    }

    use test_db::Value;

    const LONDON_IP: Ipv4Addr = Ipv4Addr::new(81, 2, 69, 142);
    const STOCKHOLM_IP: Ipv4Addr = Ipv4Addr::new(89, 160, 20, 112);
    const CORRUPT_IP: Ipv4Addr = Ipv4Addr::new(10, 1, 2, 3);

    fn names(en: &'static str) -> Value {
        Value::Map(vec![("de", Value::Str("-")), ("en", Value::Str(en))])
    }

    fn test_source() -> MaxMindGeoSource {
        let london = Value::Map(vec![
            (
                "city",
                Value::Map(vec![
                    ("geoname_id", Value::U32(2643743)),
                    ("names", names("London")),
                ]),
            ),
            (
                "country",
                Value::Map(vec![
                    ("geoname_id", Value::U32(2635167)),
                    ("iso_code", Value::Str("GB")),
                    ("names", names("United Kingdom")),
                ]),
            ),
            (
                "subdivisions",
                Value::Array(vec![
                    Value::Map(vec![
                        ("geoname_id", Value::U32(6269131)),
                        ("iso_code", Value::Str("ENG")),
                        ("names", names("England")),
                    ]),
                    Value::Map(vec![
                        ("geoname_id", Value::U32(3333218)),
                        ("iso_code", Value::Str("WBK")),
                        ("names", names("West Berkshire")),
                    ]),
                ]),
            ),
        ]);
        let sweden = Value::Map(vec![(
            "country",
            Value::Map(vec![
                ("geoname_id", Value::U32(2661886)),
                ("is_in_european_union", Value::Bool(true)),
                ("iso_code", Value::Str("SE")),
                ("names", names("Sweden")),
            ]),
        )]);
        let corrupt = Value::Map(vec![
            ("city", Value::Str("not a block")),
            ("country", Value::U16(7)),
        ]);

        let db = test_db::build(vec![
            (Ipv4Addr::new(81, 2, 69, 0), 24, london),
            (Ipv4Addr::new(89, 160, 20, 0), 24, sweden),
            (Ipv4Addr::new(10, 0, 0, 0), 8, corrupt),
        ]);
        MaxMindGeoSource::from_bytes(db).unwrap()
    }

    #[test]
    fn test_reader_database_type() {
        assert_eq!(test_source().database_type(), "GeoLite2-City");
    }

    #[test]
    fn test_reader_city_lookup() {
        let location = test_source().try_city(LONDON_IP).unwrap();

        assert_eq!(
            location,
            Lookup::Found(CityLocation::new(
                City::new("London", 2643743),
                State::new("West Berkshire", 3333218, "WBK"),
            ))
        );
    }

    #[test]
    fn test_reader_country_lookup() {
        let source = test_source();

        assert_eq!(
            source.try_country(LONDON_IP).unwrap(),
            Lookup::Found(CountryLocation::new(Country::new(
                "United Kingdom",
                2635167,
                false,
                "GB"
            )))
        );
        assert_eq!(
            source.try_country(STOCKHOLM_IP).unwrap(),
            Lookup::Found(CountryLocation::new(Country::new(
                "Sweden", 2661886, true, "SE"
            )))
        );
    }

    #[test]
    fn test_reader_record_without_city_is_absent() {
        assert_eq!(test_source().try_city(STOCKHOLM_IP).unwrap(), Lookup::Absent);
    }

    #[test]
    fn test_reader_address_not_in_database_is_absent() {
        let source = test_source();
        let ip = Ipv4Addr::new(127, 0, 0, 1);

        assert_eq!(source.try_city(ip).unwrap(), Lookup::Absent);
        assert_eq!(source.try_country(ip).unwrap(), Lookup::Absent);
    }

    #[test]
    fn test_reader_undecodable_record_is_source_error() {
        let source = test_source();

        assert!(matches!(
            source.try_city(CORRUPT_IP),
            Err(LookupError::Source(_))
        ));
        assert!(matches!(
            source.try_country(CORRUPT_IP),
            Err(LookupError::Source(_))
        ));
    }

    // ===== Loading Tests =====

    #[test]
    fn test_from_file_nonexistent() {
        let result = MaxMindGeoSource::from_file("/nonexistent/path/GeoLite2-City.mmdb");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = MaxMindGeoSource::from_bytes(b"not a maxmind database".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn test_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaxMindGeoSource>();
    }
}
