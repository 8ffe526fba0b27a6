//! Cache-aside text search over ads.
//!
//! The cache is keyed by the raw query string and holds the JSON snapshot of
//! the last store result for that key. Any cache fault degrades to a plain
//! store query; only store failures reach the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{CacheError, CacheStore};
use crate::config::{CacheConfig, SearchConfig};
use crate::models::ad::{AdRecord, TextSearch};
use crate::ports::AdRepository;

const CACHE_REQUESTS_METRIC: &str = "search_cache_requests_total";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Store error: {0}")]
    Store(String),
}

impl From<sea_orm::DbErr> for SearchError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

fn record_outcome(outcome: &'static str) {
    metrics::counter!(CACHE_REQUESTS_METRIC, "outcome" => outcome).increment(1);
}

pub struct SearchService {
    ads: Arc<dyn AdRepository>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
    operation_timeout: Duration,
    options: TextSearch,
}

impl SearchService {
    #[must_use]
    pub fn new(
        ads: Arc<dyn AdRepository>,
        cache: Arc<dyn CacheStore>,
        cache_config: &CacheConfig,
        search_config: &SearchConfig,
    ) -> Self {
        Self {
            ads,
            cache,
            ttl: Duration::from_secs(cache_config.ttl_seconds),
            operation_timeout: Duration::from_millis(cache_config.operation_timeout_ms),
            options: TextSearch {
                order: search_config.order,
                limit: search_config.max_results,
            },
        }
    }

    #[must_use]
    pub fn cache_backend(&self) -> &'static str {
        self.cache.name()
    }

    /// Returns the ads whose title or description contains `query`,
    /// ignoring case.
    ///
    /// The query is used verbatim as the cache key. A hit returns the cached
    /// snapshot without touching the store; a miss queries the store and
    /// writes the result back with the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Store`] when the store query fails. Cache
    /// failures are logged and never returned.
    pub async fn search_ads(&self, query: &str) -> Result<Vec<AdRecord>, SearchError> {
        if let Some(cached) = self.probe(query).await {
            return Ok(cached);
        }

        let ads = self.ads.search_by_text(query, self.options).await?;
        self.populate(query, &ads).await;

        Ok(ads)
    }

    async fn probe(&self, query: &str) -> Option<Vec<AdRecord>> {
        let raw = match self.bounded(self.cache.get(query)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(query, backend = self.cache.name(), "Search cache miss");
                record_outcome("miss");
                return None;
            }
            Err(e) => {
                warn!(query, backend = self.cache.name(), error = %e, "Search cache read failed");
                record_outcome("error");
                return None;
            }
        };

        match serde_json::from_str::<Vec<AdRecord>>(&raw) {
            Ok(ads) => {
                debug!(query, results = ads.len(), "Search cache hit");
                record_outcome("hit");
                Some(ads)
            }
            Err(e) => {
                warn!(query, error = %e, "Discarding unreadable search cache entry");
                record_outcome("corrupt");
                None
            }
        }
    }

    async fn populate(&self, query: &str, ads: &[AdRecord]) {
        let value = match serde_json::to_string(ads) {
            Ok(value) => value,
            Err(e) => {
                warn!(query, error = %e, "Failed to serialize search result for cache");
                return;
            }
        };

        if let Err(e) = self.bounded(self.cache.set(query, &value, self.ttl)).await {
            warn!(query, backend = self.cache.name(), error = %e, "Search cache write failed");
        }
    }

    /// Runs one cache operation under the configured deadline.
    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        tokio::time::timeout(self.operation_timeout, op)
            .await
            .unwrap_or_else(|_| {
                Err(CacheError::Backend(format!(
                    "timed out after {} ms",
                    self.operation_timeout.as_millis()
                )))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::config::SearchOrder;
    use crate::domain::{AdId, CategoryId};
    use crate::models::ad::{AdWrite, fixtures};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Repository double that matches like the real store and counts queries.
    struct CountingRepository {
        ads: Vec<AdRecord>,
        searches: AtomicUsize,
        last_options: Mutex<Option<TextSearch>>,
        fail: bool,
    }

    impl CountingRepository {
        fn new(titles: &[&str]) -> Self {
            Self {
                ads: titles.iter().map(|t| fixtures::ad(t, "")).collect(),
                searches: AtomicUsize::new(0),
                last_options: Mutex::new(None),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new(&[])
            }
        }

        fn searches(&self) -> usize {
            self.searches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AdRepository for CountingRepository {
        async fn find_by_id(&self, id: AdId) -> anyhow::Result<Option<AdRecord>> {
            Ok(self.ads.iter().find(|a| a.id == id).cloned())
        }

        async fn search_by_text(
            &self,
            query: &str,
            options: TextSearch,
        ) -> anyhow::Result<Vec<AdRecord>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            *self.last_options.lock().unwrap() = Some(options);
            if self.fail {
                anyhow::bail!("database is locked");
            }
            let needle = query.to_lowercase();
            Ok(self
                .ads
                .iter()
                .filter(|a| {
                    a.title.to_lowercase().contains(&needle)
                        || a.description.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect())
        }

        async fn list_recent(
            &self,
            _category: Option<CategoryId>,
            _limit: u64,
        ) -> anyhow::Result<Vec<AdRecord>> {
            Ok(self.ads.clone())
        }

        async fn insert(&self, _ad: &AdWrite) -> anyhow::Result<AdRecord> {
            anyhow::bail!("read-only test repository")
        }

        async fn update(&self, _ad: &AdWrite) -> anyhow::Result<Option<AdRecord>> {
            anyhow::bail!("read-only test repository")
        }

        async fn delete(&self, _id: AdId) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    /// Cache whose reads and writes can be made to fail or hang.
    #[derive(Default)]
    struct FaultyCache {
        fail_get: bool,
        fail_set: bool,
        hang: bool,
        sets: AtomicUsize,
    }

    #[async_trait]
    impl CacheStore for FaultyCache {
        fn name(&self) -> &'static str {
            "faulty"
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail_get {
                return Err(CacheError::Connection("connection refused".to_string()));
            }
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            self.sets.fetch_add(1, Ordering::SeqCst);
            if self.hang {
                std::future::pending::<()>().await;
            }
            if self.fail_set {
                return Err(CacheError::Connection("connection refused".to_string()));
            }
            Ok(())
        }
    }

    fn service(repo: Arc<CountingRepository>, cache: Arc<dyn CacheStore>) -> SearchService {
        SearchService::new(repo, cache, &CacheConfig::default(), &SearchConfig::default())
    }

    fn titles(ads: &[AdRecord]) -> Vec<&str> {
        ads.iter().map(|a| a.title.as_str()).collect()
    }

    #[tokio::test]
    async fn miss_queries_store_once_and_populates_cache() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike", "Blue Car", "red scooter"]));
        let cache = Arc::new(MemoryCacheStore::new());
        let search = service(repo.clone(), cache.clone());

        let results = search.search_ads("red").await.unwrap();

        assert_eq!(titles(&results), vec!["Red Bike", "red scooter"]);
        assert_eq!(repo.searches(), 1);

        let stored = cache.get("red").await.unwrap().unwrap();
        let snapshot: Vec<AdRecord> = serde_json::from_str(&stored).unwrap();
        assert_eq!(snapshot, results);
    }

    #[tokio::test]
    async fn hit_returns_identical_sequence_without_store_query() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike", "Blue Car", "red scooter"]));
        let search = service(repo.clone(), Arc::new(MemoryCacheStore::new()));

        let first = search.search_ads("red").await.unwrap();
        let second = search.search_ads("red").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.searches(), 1);
    }

    #[tokio::test]
    async fn keys_are_not_normalised() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike"]));
        let search = service(repo.clone(), Arc::new(MemoryCacheStore::new()));

        search.search_ads("red").await.unwrap();
        search.search_ads("Red").await.unwrap();
        search.search_ads(" red").await.unwrap();

        assert_eq!(repo.searches(), 3);
    }

    #[tokio::test]
    async fn expired_entry_requeries_store() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike"]));
        let mut search = service(repo.clone(), Arc::new(MemoryCacheStore::new()));
        search.ttl = Duration::from_millis(100);

        search.search_ads("red").await.unwrap();
        search.search_ads("red").await.unwrap();
        assert_eq!(repo.searches(), 1);

        tokio::time::sleep(Duration::from_millis(250)).await;
        search.search_ads("red").await.unwrap();
        assert_eq!(repo.searches(), 2);
    }

    #[tokio::test]
    async fn empty_query_matches_everything_and_is_cached() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike", "Blue Car"]));
        let cache = Arc::new(MemoryCacheStore::new());
        let search = service(repo.clone(), cache.clone());

        let results = search.search_ads("").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(cache.get("").await.unwrap().is_some());

        search.search_ads("").await.unwrap();
        assert_eq!(repo.searches(), 1);
    }

    #[tokio::test]
    async fn empty_result_is_cached_too() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike"]));
        let search = service(repo.clone(), Arc::new(MemoryCacheStore::new()));

        assert!(search.search_ads("green").await.unwrap().is_empty());
        assert!(search.search_ads("green").await.unwrap().is_empty());
        assert_eq!(repo.searches(), 1);
    }

    #[tokio::test]
    async fn corrupt_entry_falls_back_and_is_overwritten() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike"]));
        let cache = Arc::new(MemoryCacheStore::new());
        cache
            .set("red", "{not json", Duration::from_secs(600))
            .await
            .unwrap();
        let search = service(repo.clone(), cache.clone());

        let results = search.search_ads("red").await.unwrap();
        assert_eq!(titles(&results), vec!["Red Bike"]);
        assert_eq!(repo.searches(), 1);

        let stored = cache.get("red").await.unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<AdRecord>>(&stored).is_ok());
    }

    #[tokio::test]
    async fn failing_cache_reads_and_writes_still_answer() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike", "Blue Car"]));
        let cache = Arc::new(FaultyCache {
            fail_get: true,
            fail_set: true,
            ..Default::default()
        });
        let search = service(repo.clone(), cache.clone());

        let results = search.search_ads("red").await.unwrap();
        assert_eq!(titles(&results), vec!["Red Bike"]);

        search.search_ads("red").await.unwrap();
        assert_eq!(repo.searches(), 2);
        assert_eq!(cache.sets.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_cache_is_bounded_by_timeout() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike"]));
        let cache = Arc::new(FaultyCache {
            hang: true,
            ..Default::default()
        });
        let search = service(repo.clone(), cache);

        let results = search.search_ads("red").await.unwrap();
        assert_eq!(titles(&results), vec!["Red Bike"]);
        assert_eq!(repo.searches(), 1);
    }

    #[tokio::test]
    async fn store_failure_surfaces_and_nothing_is_cached() {
        let repo = Arc::new(CountingRepository::failing());
        let cache = Arc::new(MemoryCacheStore::new());
        let search = service(repo, cache.clone());

        let err = search.search_ads("red").await.unwrap_err();
        assert!(matches!(err, SearchError::Store(msg) if msg.contains("database is locked")));
        assert_eq!(cache.get("red").await.unwrap(), None);
    }

    #[tokio::test]
    async fn search_options_come_from_config() {
        let repo = Arc::new(CountingRepository::new(&["Red Bike"]));
        let search_config = SearchConfig {
            order: SearchOrder::Newest,
            max_results: Some(50),
            ..Default::default()
        };
        let search = SearchService::new(
            repo.clone(),
            Arc::new(MemoryCacheStore::new()),
            &CacheConfig::default(),
            &search_config,
        );

        search.search_ads("red").await.unwrap();

        let options = repo.last_options.lock().unwrap().unwrap();
        assert_eq!(options.order, SearchOrder::Newest);
        assert_eq!(options.limit, Some(50));
    }
}
