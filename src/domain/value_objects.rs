//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Discriminator selecting which location shape a lookup targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// City and state (most specific subdivision) of an address
    City,
    /// Country of an address
    Country,
}

impl RecordKind {
    /// Name used to partition cache storage per kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::City => "CITY",
            Self::Country => "COUNTRY",
        }
    }

    /// Lowercase label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Country => "country",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Key of a cached location: one entry per (kind, address) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: RecordKind,
    pub ip: Ipv4Addr,
}

impl CacheKey {
    pub fn new(kind: RecordKind, ip: Ipv4Addr) -> Self {
        Self { kind, ip }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.ip)
    }
}

/// Outcome of a lookup against a data store that may simply not know the address.
///
/// Absence is a normal result, not an error. Keeping it as its own variant
/// makes every hit/miss branch explicit at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    Absent,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Convert into an `Option`, dropping the distinction in naming only.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::Absent => Lookup::Absent,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Found(v),
            None => Self::Absent,
        }
    }
}
