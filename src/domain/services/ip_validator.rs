//! IPv4 address validation
//!
//! Pure domain logic with no I/O: decides whether a caller-supplied string
//! is an address lookups can run against.

use crate::domain::error::LookupError;
use std::net::Ipv4Addr;

/// Validator for caller-supplied addresses.
pub struct IpValidator;

impl IpValidator {
    /// Validate an optional address.
    ///
    /// An absent or empty address is accepted and yields `None`: callers
    /// substitute the host's public IP in that case. Anything else must be
    /// a dotted-quad of exactly four decimal octets in `0..=255`, without
    /// leading zeros, whitespace or other characters.
    ///
    /// # Examples
    /// ```
    /// use ip_geolocation::domain::services::IpValidator;
    /// use std::net::Ipv4Addr;
    ///
    /// assert_eq!(IpValidator::validate(None).unwrap(), None);
    /// assert_eq!(
    ///     IpValidator::validate(Some("8.8.8.8")).unwrap(),
    ///     Some(Ipv4Addr::new(8, 8, 8, 8))
    /// );
    /// assert!(IpValidator::validate(Some("invalid")).is_err());
    /// ```
    pub fn validate(ip: Option<&str>) -> Result<Option<Ipv4Addr>, LookupError> {
        match ip {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<Ipv4Addr>()
                .map(Some)
                .map_err(|_| LookupError::InvalidIp(raw.to_string())),
        }
    }
}
