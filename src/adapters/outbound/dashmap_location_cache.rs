//! DashMap Location Cache
//!
//! Implements LocationCache using DashMap for lock-free concurrent access.

use crate::domain::entities::CachedLocation;
use crate::domain::error::LookupError;
use crate::domain::ports::LocationCache;
use crate::domain::value_objects::CacheKey;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-process location cache.
///
/// Entries live for the lifetime of the process; nothing is evicted.
pub struct DashMapLocationCache {
    entries: Arc<DashMap<CacheKey, CachedLocation>>,
}

impl DashMapLocationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Number of cached locations across all kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DashMapLocationCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationCache for DashMapLocationCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedLocation>, LookupError> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn put(
        &self,
        key: CacheKey,
        location: CachedLocation,
    ) -> Result<CachedLocation, LookupError> {
        self.entries.insert(key, location.clone());
        Ok(location)
    }
}
