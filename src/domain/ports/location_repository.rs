//! Location Repository Port
//!
//! Defines how the application layer retrieves one kind of location record.

use crate::domain::error::LookupError;
use crate::domain::value_objects::Lookup;
use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Repository of location records of kind `R`.
#[async_trait]
pub trait LocationRepository<R>: Send + Sync {
    /// Find the record for an address already known to be valid IPv4.
    async fn find(&self, ip: Ipv4Addr) -> Result<Lookup<R>, LookupError>;
}
