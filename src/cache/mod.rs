//! Key-value stores that back the search cache.
//!
//! Every backend stores opaque strings under a caller-chosen key with a TTL.
//! Callers treat any [`CacheError`] as "no cache" and carry on.

mod database;
mod memory;
mod redis;

pub use database::DatabaseCacheStore;
pub use memory::MemoryCacheStore;
pub use self::redis::RedisCacheStore;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{CacheBackend, CacheConfig};
use crate::db::Store;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    Connection(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl From<::redis::RedisError> for CacheError {
    fn from(err: ::redis::RedisError) -> Self {
        if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
            Self::Connection(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}

impl From<sea_orm::DbErr> for CacheError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<anyhow::Error> for CacheError {
    fn from(err: anyhow::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Backend used when caching is disabled. Never hits, never stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCacheStore;

#[async_trait]
impl CacheStore for NoopCacheStore {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Builds the process-wide cache handle from configuration.
///
/// Nothing here touches the network: the Redis connection is opened on first
/// use and shared afterwards.
pub fn build_cache_store(config: &CacheConfig, store: &Store) -> anyhow::Result<Arc<dyn CacheStore>> {
    let cache: Arc<dyn CacheStore> = match config.backend {
        CacheBackend::Redis => Arc::new(RedisCacheStore::new(&config.redis_url)?),
        CacheBackend::Database => Arc::new(DatabaseCacheStore::new(store.clone())),
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new()),
        CacheBackend::Disabled => Arc::new(NoopCacheStore),
    };

    info!("Search cache backend: {}", cache.name());
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_store_never_hits() {
        let cache = NoopCacheStore;
        cache
            .set("red", "[]", Duration::from_secs(600))
            .await
            .unwrap();
        assert_eq!(cache.get("red").await.unwrap(), None);
    }

    #[test]
    fn cache_error_display() {
        let err = CacheError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Cache connection failed: refused");
    }
}
