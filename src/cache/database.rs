use async_trait::async_trait;
use std::time::Duration;

use super::{CacheError, CacheStore};
use crate::db::Store;

/// Store backed by the `search_cache` table of the main database.
///
/// Useful when no Redis instance is available; expiry is enforced on read.
pub struct DatabaseCacheStore {
    store: Store,
}

impl DatabaseCacheStore {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CacheStore for DatabaseCacheStore {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.store.get_cached_value(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.store.put_cached_value(key, value, ttl).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache() -> DatabaseCacheStore {
        DatabaseCacheStore::new(Store::new("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn stores_and_overwrites_by_key() {
        let cache = cache().await;
        let ttl = Duration::from_secs(600);

        assert_eq!(cache.get("red").await.unwrap(), None);

        cache.set("red", "[1]", ttl).await.unwrap();
        cache.set("red", "[2]", ttl).await.unwrap();
        cache.set("Red", "[3]", ttl).await.unwrap();

        assert_eq!(cache.get("red").await.unwrap().as_deref(), Some("[2]"));
        assert_eq!(cache.get("Red").await.unwrap().as_deref(), Some("[3]"));
    }

    #[tokio::test]
    async fn expired_rows_are_misses() {
        let cache = cache().await;

        cache.set("red", "[1]", Duration::ZERO).await.unwrap();
        assert_eq!(cache.get("red").await.unwrap(), None);

        // Rewriting an expired key revives it
        cache.set("red", "[2]", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("red").await.unwrap().as_deref(), Some("[2]"));
    }

    #[tokio::test]
    async fn out_of_range_ttl_is_an_error() {
        let cache = cache().await;

        let err = cache
            .set("red", "[1]", Duration::from_secs(u64::MAX / 2))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::Backend(_)));
        assert_eq!(cache.get("red").await.unwrap(), None);
    }
}
