//! Storage seams the services depend on.
//!
//! Services receive these as `Arc<dyn ...>` so the persistence layer can be
//! swapped for in-memory fakes in tests.

use async_trait::async_trait;

use crate::domain::{AdId, CategoryId};
use crate::models::ad::{AdRecord, AdWrite, TextSearch};

/// Persistence capabilities for ads, independent of the ORM.
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Loads one ad with owner, category and tags resolved.
    async fn find_by_id(&self, id: AdId) -> anyhow::Result<Option<AdRecord>>;

    /// Case-insensitive substring match on title or description.
    async fn search_by_text(&self, query: &str, options: TextSearch)
    -> anyhow::Result<Vec<AdRecord>>;

    /// Newest ads first, optionally restricted to one category.
    async fn list_recent(
        &self,
        category: Option<CategoryId>,
        limit: u64,
    ) -> anyhow::Result<Vec<AdRecord>>;

    /// Inserts a new ad row and its tag links atomically.
    async fn insert(&self, ad: &AdWrite) -> anyhow::Result<AdRecord>;

    /// Rewrites an existing ad and replaces its tag links atomically.
    /// Returns `None` if the row no longer exists; nothing is inserted then.
    async fn update(&self, ad: &AdWrite) -> anyhow::Result<Option<AdRecord>>;

    /// Deletes the ad and its tag links. Returns false if nothing was deleted.
    async fn delete(&self, id: AdId) -> anyhow::Result<bool>;
}
