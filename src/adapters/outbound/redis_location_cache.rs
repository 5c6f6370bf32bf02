//! Redis Location Cache
//!
//! Implements LocationCache on a shared Redis server so several service
//! instances reuse each other's lookups.
//!
//! Layout: one hash per record kind (`CITY`, `COUNTRY`), field = IP address,
//! value = JSON of the location record.

use crate::domain::entities::{CachedLocation, CityLocation, CountryLocation};
use crate::domain::error::LookupError;
use crate::domain::ports::LocationCache;
use crate::domain::value_objects::{CacheKey, RecordKind};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Redis-backed location cache.
///
/// Holds one multiplexed connection, established lazily and dropped after
/// any command error so the next call reconnects.
pub struct RedisLocationCache {
    client: redis::Client,
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
}

impl RedisLocationCache {
    /// Create a cache for the Redis server at `host:port`.
    ///
    /// No connection is made until the first command.
    pub fn new(host: &str, port: u16) -> anyhow::Result<Self> {
        let client = redis::Client::open(format!("redis://{}:{}/", host, port))?;
        tracing::debug!("redis location cache configured for {}:{}", host, port);
        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, LookupError> {
        {
            let guard = self.connection.read().await;
            if let Some(conn) = guard.as_ref() {
                return Ok(conn.clone());
            }
        }

        let mut guard = self.connection.write().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                tracing::error!("failed to connect to redis: {}", e);
                LookupError::Cache(e.to_string())
            })?;
        *guard = Some(conn.clone());
        tracing::debug!("redis connection established");

        Ok(conn)
    }

    async fn reset_connection(&self) {
        *self.connection.write().await = None;
        tracing::debug!("redis connection reset");
    }
}

/// Serialize the record held by a cached location.
fn encode(location: &CachedLocation) -> Result<String, LookupError> {
    let encoded = match location {
        CachedLocation::City(city) => serde_json::to_string(city),
        CachedLocation::Country(country) => serde_json::to_string(country),
    };
    encoded.map_err(|e| LookupError::Cache(e.to_string()))
}

/// Parse a stored record according to the kind it was stored under.
fn decode(kind: RecordKind, data: &str) -> Result<CachedLocation, LookupError> {
    let decoded = match kind {
        RecordKind::City => serde_json::from_str::<CityLocation>(data).map(CachedLocation::City),
        RecordKind::Country => {
            serde_json::from_str::<CountryLocation>(data).map(CachedLocation::Country)
        }
    };
    decoded.map_err(|e| LookupError::Cache(format!("malformed {} entry: {}", kind, e)))
}

#[async_trait]
impl LocationCache for RedisLocationCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedLocation>, LookupError> {
        let mut conn = self.connection().await?;

        let result: redis::RedisResult<Option<String>> =
            conn.hget(key.kind.as_str(), key.ip.to_string()).await;

        match result {
            Ok(Some(data)) => decode(key.kind, &data).map(Some),
            Ok(None) => Ok(None),
            Err(e) => {
                tracing::error!("failed to read {} from redis: {}", key, e);
                self.reset_connection().await;
                Err(LookupError::Cache(e.to_string()))
            }
        }
    }

    async fn put(
        &self,
        key: CacheKey,
        location: CachedLocation,
    ) -> Result<CachedLocation, LookupError> {
        let data = encode(&location)?;
        let mut conn = self.connection().await?;

        let result: redis::RedisResult<()> =
            conn.hset(key.kind.as_str(), key.ip.to_string(), data).await;

        match result {
            Ok(()) => Ok(location),
            Err(e) => {
                tracing::error!("failed to write {} to redis: {}", key, e);
                self.reset_connection().await;
                Err(LookupError::Cache(e.to_string()))
            }
        }
    }
}
