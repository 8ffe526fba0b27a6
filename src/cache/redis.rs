use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

use super::{CacheError, CacheStore};

/// Redis-backed store.
///
/// The connection is created on first use and then shared by every request;
/// `ConnectionManager` reconnects on its own after the server comes back.
pub struct RedisCacheStore {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisCacheStore {
    /// Parses the URL only. No connection is attempted here.
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::Connection(format!("Invalid Redis URL: {e}")))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .connection
            .get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone()).await?;
                info!("Connected to Redis search cache");
                Ok::<_, redis::RedisError>(manager)
            })
            .await?;

        Ok(conn.clone())
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        // EX takes whole seconds and rejects 0
        let seconds = ttl.as_secs().max(1);
        let () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(RedisCacheStore::new("not a url").is_err());
    }

    #[test]
    fn construction_does_not_connect() {
        // Nothing listens on this port; building the store must still succeed.
        let store = RedisCacheStore::new("redis://127.0.0.1:1").unwrap();
        assert_eq!(store.name(), "redis");
    }
}
