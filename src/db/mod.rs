use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::{CategoryId, TagId, UserId};
use crate::models::catalog::{Category, Tag};
use crate::models::user::{NewUser, User};

pub mod migrator;
pub mod repositories;

pub use repositories::ad::SeaOrmAdRepository;

/// Formats a timestamp the way every table stores it.
///
/// Fixed microsecond precision and a `Z` suffix keep lexical order equal to
/// chronological order, which the `created_at` and `expires_at` filters rely on.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// True when the error chain contains a unique constraint failure.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<DbErr>())
        .any(|e| matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// Ad persistence behind the `AdRepository` seam.
    #[must_use]
    pub fn ad_repo(&self) -> SeaOrmAdRepository {
        SeaOrmAdRepository::new(self.conn.clone())
    }

    fn category_repo(&self) -> repositories::category::CategoryRepository {
        repositories::category::CategoryRepository::new(self.conn.clone())
    }

    fn tag_repo(&self) -> repositories::tag::TagRepository {
        repositories::tag::TagRepository::new(self.conn.clone())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    pub async fn count_ads(&self) -> Result<u64> {
        self.ad_repo().count().await
    }

    // ========== Catalog ==========

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.category_repo().list().await
    }

    pub async fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        self.category_repo().get(id).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        self.category_repo().create(name).await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.tag_repo().list().await
    }

    pub async fn get_tag(&self, id: TagId) -> Result<Option<Tag>> {
        self.tag_repo().get(id).await
    }

    pub async fn get_tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>> {
        self.tag_repo().get_by_ids(ids).await
    }

    pub async fn create_tag(&self, name: &str) -> Result<Tag> {
        self.tag_repo().create(name).await
    }

    // ========== Users ==========

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get(id).await
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<User> {
        self.user_repo().create(user).await
    }

    // ========== Search cache table ==========

    pub async fn get_cached_value(&self, key: &str) -> Result<Option<String>> {
        self.cache_repo().get(key).await
    }

    pub async fn put_cached_value(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.cache_repo().put(key, value, ttl).await
    }
}
