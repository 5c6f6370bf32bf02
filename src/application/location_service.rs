//! Location Service - per-kind lookup use case
//!
//! Applies the host-default-IP policy and turns an empty repository
//! result into a not-found failure.

use crate::domain::error::LookupError;
use crate::domain::ports::LocationRepository;
use crate::domain::record::LocationRecord;
use crate::domain::value_objects::Lookup;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Lookup service for one record kind.
pub struct LocationService<R> {
    /// Public IP of the machine this service runs on
    host_public_ip: Ipv4Addr,
    repository: Arc<dyn LocationRepository<R>>,
}

impl<R: LocationRecord> LocationService<R> {
    pub fn new(host_public_ip: Ipv4Addr, repository: Arc<dyn LocationRepository<R>>) -> Self {
        Self {
            host_public_ip,
            repository,
        }
    }

    /// Resolve the record for an address.
    ///
    /// Fails with `LookupError::NotFound` if the address has no location.
    pub async fn resolve_for_ip(&self, ip: Ipv4Addr) -> Result<R, LookupError> {
        match self.repository.find(ip).await? {
            Lookup::Found(record) => Ok(record),
            Lookup::Absent => Err(LookupError::NotFound { kind: R::KIND, ip }),
        }
    }

    /// Resolve the record for the host's own public IP.
    pub async fn resolve_for_host(&self) -> Result<R, LookupError> {
        self.resolve_for_ip(self.host_public_ip).await
    }

    pub fn host_public_ip(&self) -> Ipv4Addr {
        self.host_public_ip
    }
}
