//! Hybrid Location Repository
//!
//! Cache-aside lookups: the cache is consulted first, the geolocation source
//! only on a miss, and source hits are written through to the cache.

use crate::domain::error::LookupError;
use crate::domain::ports::{GeoSource, LocationCache, LocationRepository};
use crate::domain::record::LocationRecord;
use crate::domain::value_objects::{CacheKey, Lookup};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// Repository combining a fast cache with the authoritative geolocation source.
///
/// Absence is never cached, so a later lookup of an unknown address queries
/// the source again. Concurrent misses for the same key may each query the
/// source and each write the same value; writes are idempotent so no
/// coordination happens between them.
pub struct HybridLocationRepository<R> {
    cache: Arc<dyn LocationCache>,
    source: Arc<dyn GeoSource>,
    _record: PhantomData<fn() -> R>,
}

impl<R: LocationRecord> HybridLocationRepository<R> {
    pub fn new(cache: Arc<dyn LocationCache>, source: Arc<dyn GeoSource>) -> Self {
        Self {
            cache,
            source,
            _record: PhantomData,
        }
    }

    /// Look up the record for an address.
    ///
    /// 1. Return the cached record if present (source is not consulted)
    /// 2. Otherwise query the source
    /// 3. Write a source hit to the cache and return it
    ///
    /// Source failures propagate as-is and leave the cache untouched.
    pub async fn lookup(&self, ip: Ipv4Addr) -> Result<Lookup<R>, LookupError> {
        let key = CacheKey::new(R::KIND, ip);

        if let Some(cached) = self.cache.get(&key).await? {
            let record = R::from_cached(cached).ok_or_else(|| {
                LookupError::Cache(format!("entry {} holds a different record kind", key))
            })?;
            tracing::debug!("cache hit for {}", key);
            return Ok(Lookup::Found(record));
        }

        tracing::debug!("cache miss for {}, querying geolocation source", key);

        match R::fetch(self.source.as_ref(), ip)? {
            Lookup::Found(record) => {
                self.cache.put(key, record.clone().into_cached()).await?;
                tracing::debug!("cached {}", key);
                Ok(Lookup::Found(record))
            }
            Lookup::Absent => {
                tracing::debug!("no location for {} in geolocation source", key);
                Ok(Lookup::Absent)
            }
        }
    }
}

#[async_trait]
impl<R: LocationRecord> LocationRepository<R> for HybridLocationRepository<R> {
    async fn find(&self, ip: Ipv4Addr) -> Result<Lookup<R>, LookupError> {
        self.lookup(ip).await
    }
}
