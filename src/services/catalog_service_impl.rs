//! `SeaORM` implementation of the `CatalogService` trait.

use std::sync::Arc;
use tracing::info;

use crate::db::{Store, is_unique_violation};
use crate::domain::{CategoryId, TagId};
use crate::models::catalog::{Category, Tag};
use crate::services::catalog_service::{CatalogError, CatalogService, normalize_name};

pub struct SeaOrmCatalogService {
    store: Arc<Store>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_categories(&self) -> Result<Vec<Category>, CatalogError> {
        Ok(self.store.list_categories().await?)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, CatalogError> {
        self.store
            .get_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    async fn create_category(&self, name: &str) -> Result<Category, CatalogError> {
        let name = normalize_name(name)?;

        let category = self.store.create_category(name).await.map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::Conflict(format!("Category '{name}' already exists"))
            } else {
                CatalogError::from(e)
            }
        })?;

        info!(category_id = %category.id, "Created category '{}'", category.name);
        Ok(category)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogError> {
        Ok(self.store.list_tags().await?)
    }

    async fn get_tag(&self, id: TagId) -> Result<Tag, CatalogError> {
        self.store
            .get_tag(id)
            .await?
            .ok_or(CatalogError::TagNotFound(id))
    }

    async fn create_tag(&self, name: &str) -> Result<Tag, CatalogError> {
        let name = normalize_name(name)?;

        let tag = self.store.create_tag(name).await.map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::Conflict(format!("Tag '{name}' already exists"))
            } else {
                CatalogError::from(e)
            }
        })?;

        info!(tag_id = %tag.id, "Created tag '{}'", tag.name);
        Ok(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> SeaOrmCatalogService {
        let store = Store::new("sqlite::memory:").await.unwrap();
        SeaOrmCatalogService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn duplicate_category_is_a_conflict() {
        let service = service().await;

        let created = service.create_category(" Vehicles ").await.unwrap();
        assert_eq!(created.name, "Vehicles");

        let err = service.create_category("Vehicles").await.unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn categories_are_listed_by_name() {
        let service = service().await;
        service.create_category("Vehicles").await.unwrap();
        service.create_category("Furniture").await.unwrap();

        let names: Vec<_> = service
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Furniture", "Vehicles"]);
    }

    #[tokio::test]
    async fn tags_lookup_and_conflict() {
        let service = service().await;
        let tag = service.create_tag("used").await.unwrap();

        assert_eq!(service.get_tag(tag.id).await.unwrap(), tag);
        assert!(matches!(
            service.get_tag(TagId::new(77)).await.unwrap_err(),
            CatalogError::TagNotFound(_)
        ));
        assert!(matches!(
            service.create_tag("used").await.unwrap_err(),
            CatalogError::Conflict(_)
        ));
        assert!(matches!(
            service.create_tag("  ").await.unwrap_err(),
            CatalogError::Validation(_)
        ));
    }
}
