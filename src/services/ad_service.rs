//! Domain service for ad management.
//!
//! Handlers talk to [`AdService`]; the implementation owns validation and
//! reference resolution so that a bad owner, category or tag never reaches
//! the write path.

use thiserror::Error;

use crate::constants::limits::MAX_TITLE_LENGTH;
use crate::domain::{AdId, CategoryId, TagId, UserId};
use crate::models::ad::{AdPatch, AdRecord, NewAd};
use crate::services::search::SearchError;

#[derive(Debug, Error)]
pub enum AdError {
    #[error("Ad not found: {0}")]
    NotFound(AdId),

    #[error("Owner not found: {0}")]
    OwnerNotFound(UserId),

    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    #[error("Tag not found: {0}")]
    TagNotFound(TagId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AdError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AdError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

impl From<SearchError> for AdError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Store(msg) => Self::Database(msg),
        }
    }
}

/// Ad operations exposed to the HTTP and CLI layers.
///
/// # Examples
///
/// ```rust,ignore
/// use goodcorner::services::{AdError, AdService};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn AdService>) -> Result<(), AdError> {
///     let hits = service.search_ads("bike").await?;
///     println!("{} matches", hits.len());
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait AdService: Send + Sync {
    /// Creates an ad after resolving its owner, category and tags.
    ///
    /// # Errors
    ///
    /// - [`AdError::Validation`] for an empty title or a negative price/weight
    /// - [`AdError::OwnerNotFound`], [`AdError::CategoryNotFound`] or
    ///   [`AdError::TagNotFound`] when a reference does not resolve; nothing
    ///   is written in that case
    async fn create_ad(&self, input: NewAd) -> Result<AdRecord, AdError>;

    /// # Errors
    ///
    /// Returns [`AdError::NotFound`] if the ad does not exist.
    async fn get_ad(&self, id: AdId) -> Result<AdRecord, AdError>;

    /// Newest ads first, capped by the configured listing limit.
    async fn list_ads(&self, category: Option<CategoryId>) -> Result<Vec<AdRecord>, AdError>;

    /// Applies a partial update. A present `tag_ids` replaces the tag set.
    ///
    /// # Errors
    ///
    /// Same as [`AdService::create_ad`], plus [`AdError::NotFound`].
    async fn update_ad(&self, id: AdId, patch: AdPatch) -> Result<AdRecord, AdError>;

    /// Deletes an ad and returns it as it was.
    async fn delete_ad(&self, id: AdId) -> Result<AdRecord, AdError>;

    /// Cached substring search on title and description.
    async fn search_ads(&self, query: &str) -> Result<Vec<AdRecord>, AdError>;
}

pub(crate) fn validate_title(title: &str) -> Result<(), AdError> {
    if title.trim().is_empty() {
        return Err(AdError::Validation("Title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AdError::Validation(format!(
            "Title must be {MAX_TITLE_LENGTH} characters or less"
        )));
    }
    Ok(())
}

pub(crate) fn validate_price(price: f64) -> Result<(), AdError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AdError::Validation(format!(
            "Invalid price: {price}. Price must be zero or positive"
        )));
    }
    Ok(())
}

pub(crate) fn validate_weight(weight_grams: i32) -> Result<(), AdError> {
    if weight_grams < 0 {
        return Err(AdError::Validation(format!(
            "Invalid weight: {weight_grams}. Weight must be zero or positive"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rules() {
        assert!(validate_title("Red Bike").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn price_and_weight_rules() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_weight(0).is_ok());
        assert!(validate_weight(-1).is_err());
    }
}
