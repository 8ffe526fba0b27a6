//! Domain service for categories and tags.

use thiserror::Error;

use crate::constants::limits::MAX_NAME_LENGTH;
use crate::domain::{CategoryId, TagId};
use crate::models::catalog::{Category, Tag};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Tag not found: {0}")]
    TagNotFound(TagId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// All categories, by name.
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError>;

    async fn get_category(&self, id: CategoryId) -> Result<Category, CatalogError>;

    /// # Errors
    ///
    /// - [`CatalogError::Validation`] for a blank name
    /// - [`CatalogError::Conflict`] if the name is already used
    async fn create_category(&self, name: &str) -> Result<Category, CatalogError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError>;

    async fn get_tag(&self, id: TagId) -> Result<Tag, CatalogError>;

    /// Same rules as [`CatalogService::create_category`].
    async fn create_tag(&self, name: &str) -> Result<Tag, CatalogError>;
}

/// Trims and checks a category or tag name.
pub(crate) fn normalize_name(name: &str) -> Result<&str, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation("Name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CatalogError::Validation(format!(
            "Name must be {MAX_NAME_LENGTH} characters or less"
        )));
    }
    Ok(trimmed)
}
