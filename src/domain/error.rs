//! Lookup errors
//!
//! Every failure a location lookup can end with. Errors propagate unchanged
//! from the component that detects them up to the facade; mapping them to a
//! transport representation is the inbound adapter's job.

use crate::domain::value_objects::RecordKind;
use std::net::Ipv4Addr;

/// Failure of a location lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Supplied address is not a valid IPv4 dotted-quad.
    #[error("invalid IP format: {0}")]
    InvalidIp(String),

    /// Neither the cache nor the geolocation source know the address.
    #[error("unable to find {} location for IP {ip}", .kind.label())]
    NotFound { kind: RecordKind, ip: Ipv4Addr },

    /// The geolocation source failed; carries its original message.
    #[error("{0}")]
    Source(String),

    /// The cache store failed.
    #[error("cache failure: {0}")]
    Cache(String),
}

/// The externally distinguishable classes of [`LookupError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Failure,
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIp(_) => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Source(_) | Self::Cache(_) => ErrorKind::Failure,
        }
    }
}
