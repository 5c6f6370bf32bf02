//! Location Cache Port
//!
//! Defines the interface of the fast key/value layer in front of the
//! geolocation source.

use crate::domain::entities::CachedLocation;
use crate::domain::error::LookupError;
use crate::domain::value_objects::CacheKey;
use async_trait::async_trait;

/// Key/value store of previously resolved locations.
///
/// Entry lifecycle (TTL, eviction) belongs to the implementation; callers
/// only read and overwrite single keys and never remove them.
#[async_trait]
pub trait LocationCache: Send + Sync {
    /// Get the cached location for a key, if one exists.
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedLocation>, LookupError>;

    /// Store a location under a key, overwriting any previous value.
    ///
    /// Returns the location that was stored.
    async fn put(&self, key: CacheKey, location: CachedLocation)
        -> Result<CachedLocation, LookupError>;
}
