//! Location Facade - entry point of the lookup core
//!
//! Validates caller input and dispatches to the per-kind services.
//! This is the interface the inbound HTTP adapter talks to.

use crate::application::hybrid_repository::HybridLocationRepository;
use crate::application::location_service::LocationService;
use crate::domain::entities::{CityLocation, CountryLocation};
use crate::domain::error::LookupError;
use crate::domain::ports::{GeoSource, LocationCache};
use crate::domain::record::LocationRecord;
use crate::domain::services::IpValidator;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Facade over the city and country lookup services.
///
/// For both kinds:
/// 1. Validate the address (invalid input never reaches a service)
/// 2. Absent/empty address resolves the host's public IP
/// 3. Otherwise resolve the supplied address
///
/// Errors propagate unchanged.
pub struct LocationFacade {
    city_service: LocationService<CityLocation>,
    country_service: LocationService<CountryLocation>,
}

impl LocationFacade {
    pub fn new(
        city_service: LocationService<CityLocation>,
        country_service: LocationService<CountryLocation>,
    ) -> Self {
        Self {
            city_service,
            country_service,
        }
    }

    /// Wire a facade whose services share one cache and one geolocation source.
    pub fn from_ports(
        cache: Arc<dyn LocationCache>,
        source: Arc<dyn GeoSource>,
        host_public_ip: Ipv4Addr,
    ) -> Self {
        let city_repo = Arc::new(HybridLocationRepository::<CityLocation>::new(
            cache.clone(),
            source.clone(),
        ));
        let country_repo = Arc::new(HybridLocationRepository::<CountryLocation>::new(
            cache, source,
        ));

        Self::new(
            LocationService::new(host_public_ip, city_repo),
            LocationService::new(host_public_ip, country_repo),
        )
    }

    /// City and state of `ip`, or of the host when `ip` is absent or empty.
    pub async fn get_city_location(&self, ip: Option<&str>) -> Result<CityLocation, LookupError> {
        Self::resolve(&self.city_service, ip).await
    }

    /// Country of `ip`, or of the host when `ip` is absent or empty.
    pub async fn get_country_location(
        &self,
        ip: Option<&str>,
    ) -> Result<CountryLocation, LookupError> {
        Self::resolve(&self.country_service, ip).await
    }

    async fn resolve<R: LocationRecord>(
        service: &LocationService<R>,
        ip: Option<&str>,
    ) -> Result<R, LookupError> {
        match IpValidator::validate(ip)? {
            Some(ip) => service.resolve_for_ip(ip).await,
            None => service.resolve_for_host().await,
        }
    }
}
