use anyhow::{Context, Result};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::time::Duration;
use tracing::debug;

use crate::db::{format_timestamp, now_timestamp};
use crate::entities::{prelude::*, search_cache};

/// Raw key/value rows in `search_cache`. Values are opaque to this layer.
pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = SearchCache::find()
            .filter(search_cache::Column::Query.eq(key))
            .filter(search_cache::Column::ExpiresAt.gt(now_timestamp()))
            .one(&self.conn)
            .await?;

        Ok(entry.map(|e| e.value))
    }

    pub async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .with_context(|| format!("TTL of {}s is out of range", ttl.as_secs()))?;

        // Opportunistic cleanup, the table has no background sweeper
        if let Err(e) = self.purge_expired().await {
            debug!("Search cache cleanup failed: {}", e);
        }

        let active_model = search_cache::ActiveModel {
            query: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: Set(format_timestamp(now)),
            expires_at: Set(format_timestamp(expires_at)),
            ..Default::default()
        };

        SearchCache::insert(active_model)
            .on_conflict(
                OnConflict::column(search_cache::Column::Query)
                    .update_columns([
                        search_cache::Column::Value,
                        search_cache::Column::CreatedAt,
                        search_cache::Column::ExpiresAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn purge_expired(&self) -> Result<u64> {
        let result = SearchCache::delete_many()
            .filter(search_cache::Column::ExpiresAt.lte(now_timestamp()))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }
}
