use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::time::{Duration, Instant};

use super::{CacheError, CacheStore};
use crate::constants;

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with. A rewrite restarts
/// the clock.
struct WriteTtl;

impl Expiry<String, Entry> for WriteTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process store on a `moka` cache with per-entry TTL.
pub struct MemoryCacheStore {
    cache: Cache<String, Entry>,
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        let cache = Cache::builder()
            .name("search_cache")
            .max_capacity(constants::cache::MEMORY_MAX_ENTRIES)
            .expire_after(WriteTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if ttl > constants::cache::max_ttl() || Instant::now().checked_add(ttl).is_none() {
            return Err(CacheError::Backend(format!(
                "TTL of {}s exceeds the supported maximum",
                ttl.as_secs()
            )));
        }

        self.cache
            .insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    ttl,
                },
            )
            .await;
        Ok(())
    }
}
