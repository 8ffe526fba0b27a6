//! `SeaORM` implementation of the `AdService` trait.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::db::{Store, now_timestamp};
use crate::domain::{AdId, CategoryId, TagId, UserId};
use crate::models::ad::{AdPatch, AdRecord, AdWrite, NewAd};
use crate::ports::AdRepository;
use crate::services::ad_service::{
    AdError, AdService, validate_price, validate_title, validate_weight,
};
use crate::services::search::SearchService;

pub struct SeaOrmAdService {
    store: Arc<Store>,
    ads: Arc<dyn AdRepository>,
    search: Arc<SearchService>,
    listing_limit: u64,
}

impl SeaOrmAdService {
    #[must_use]
    pub fn new(
        store: Arc<Store>,
        ads: Arc<dyn AdRepository>,
        search: Arc<SearchService>,
        listing_limit: u64,
    ) -> Self {
        Self {
            store,
            ads,
            search,
            listing_limit,
        }
    }

    async fn ensure_owner(&self, id: UserId) -> Result<(), AdError> {
        self.store
            .get_user(id)
            .await?
            .map(|_| ())
            .ok_or(AdError::OwnerNotFound(id))
    }

    async fn ensure_category(&self, id: CategoryId) -> Result<(), AdError> {
        self.store
            .get_category(id)
            .await?
            .map(|_| ())
            .ok_or(AdError::CategoryNotFound(id))
    }

    /// Every requested tag must exist. Returns the deduplicated id list.
    async fn ensure_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, AdError> {
        let wanted: BTreeSet<TagId> = ids.iter().copied().collect();
        let wanted: Vec<TagId> = wanted.into_iter().collect();

        let found: BTreeSet<TagId> = self
            .store
            .get_tags_by_ids(&wanted)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if let Some(missing) = wanted.iter().find(|id| !found.contains(id)) {
            return Err(AdError::TagNotFound(*missing));
        }
        Ok(wanted)
    }
}

#[async_trait::async_trait]
impl AdService for SeaOrmAdService {
    async fn create_ad(&self, input: NewAd) -> Result<AdRecord, AdError> {
        validate_title(&input.title)?;
        validate_price(input.price)?;
        validate_weight(input.weight_grams)?;

        let ((), (), tag_ids) = tokio::try_join!(
            self.ensure_owner(input.owner_id),
            self.ensure_category(input.category_id),
            self.ensure_tags(&input.tag_ids),
        )?;

        let write = AdWrite {
            id: AdId::new_random(),
            title: input.title,
            description: input.description,
            owner_id: input.owner_id,
            price: input.price,
            weight_grams: input.weight_grams,
            picture: input.picture,
            location: input.location,
            category_id: input.category_id,
            created_at: now_timestamp(),
            tag_ids,
        };

        let record = self.ads.insert(&write).await?;
        info!(ad_id = %record.id, owner = %record.owner.id, "Ad created");
        Ok(record)
    }

    async fn get_ad(&self, id: AdId) -> Result<AdRecord, AdError> {
        self.ads.find_by_id(id).await?.ok_or(AdError::NotFound(id))
    }

    async fn list_ads(&self, category: Option<CategoryId>) -> Result<Vec<AdRecord>, AdError> {
        Ok(self.ads.list_recent(category, self.listing_limit).await?)
    }

    async fn update_ad(&self, id: AdId, patch: AdPatch) -> Result<AdRecord, AdError> {
        let existing = self.get_ad(id).await?;

        if let Some(title) = &patch.title {
            validate_title(title)?;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        if let Some(weight) = patch.weight_grams {
            validate_weight(weight)?;
        }

        let mut write = AdWrite::from_record(&existing);
        write.apply_scalars(&patch);

        if let Some(category_id) = patch.category_id {
            self.ensure_category(category_id).await?;
            write.category_id = category_id;
        }
        if let Some(tag_ids) = &patch.tag_ids {
            write.tag_ids = self.ensure_tags(tag_ids).await?;
        }

        let record = self.ads.update(&write).await?.ok_or(AdError::NotFound(id))?;
        info!(ad_id = %id, "Ad updated");
        Ok(record)
    }

    async fn delete_ad(&self, id: AdId) -> Result<AdRecord, AdError> {
        let existing = self.get_ad(id).await?;

        if !self.ads.delete(id).await? {
            return Err(AdError::NotFound(id));
        }
        Ok(existing)
    }

    async fn search_ads(&self, query: &str) -> Result<Vec<AdRecord>, AdError> {
        Ok(self.search.search_ads(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NoopCacheStore;
    use crate::config::{CacheConfig, SearchConfig};
    use crate::models::catalog::{Category, Tag};
    use crate::models::user::{NewUser, User};

    struct Fixture {
        store: Arc<Store>,
        service: SeaOrmAdService,
        owner: User,
        category: Category,
        tag: Tag,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(Store::new("sqlite::memory:").await.unwrap());
        let ads: Arc<dyn AdRepository> = Arc::new(store.ad_repo());
        let search = Arc::new(SearchService::new(
            ads.clone(),
            Arc::new(NoopCacheStore),
            &CacheConfig::default(),
            &SearchConfig::default(),
        ));
        let service = SeaOrmAdService::new(store.clone(), ads, search, 20);

        let owner = store
            .create_user(&NewUser {
                email: "sam@example.com".to_string(),
                first_name: "Sam".to_string(),
                last_name: "Seller".to_string(),
            })
            .await
            .unwrap();
        let category = store.create_category("Vehicles").await.unwrap();
        let tag = store.create_tag("used").await.unwrap();

        Fixture {
            store,
            service,
            owner,
            category,
            tag,
        }
    }

    fn new_ad(f: &Fixture, title: &str) -> NewAd {
        NewAd {
            title: title.to_string(),
            description: "as new".to_string(),
            owner_id: f.owner.id,
            price: 150.0,
            weight_grams: 12000,
            picture: String::new(),
            location: "Lyon".to_string(),
            category_id: f.category.id,
            tag_ids: vec![f.tag.id],
        }
    }

    #[tokio::test]
    async fn create_and_fetch() {
        let f = fixture().await;

        let created = f.service.create_ad(new_ad(&f, "Red Bike")).await.unwrap();
        assert_eq!(created.owner, f.owner);
        assert_eq!(created.category, f.category);
        assert_eq!(created.tags, vec![f.tag.clone()]);

        let fetched = f.service.get_ad(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn unknown_references_abort_before_writing() {
        let f = fixture().await;

        let mut input = new_ad(&f, "Ghost category");
        input.category_id = CategoryId::new(999);
        let err = f.service.create_ad(input).await.unwrap_err();
        assert!(matches!(err, AdError::CategoryNotFound(id) if id.value() == 999));

        let mut input = new_ad(&f, "Ghost owner");
        input.owner_id = UserId::new(999);
        let err = f.service.create_ad(input).await.unwrap_err();
        assert!(matches!(err, AdError::OwnerNotFound(_)));

        let mut input = new_ad(&f, "Ghost tag");
        input.tag_ids.push(TagId::new(42));
        let err = f.service.create_ad(input).await.unwrap_err();
        assert!(matches!(err, AdError::TagNotFound(id) if id.value() == 42));

        assert_eq!(f.store.count_ads().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let f = fixture().await;

        let mut input = new_ad(&f, "");
        let err = f.service.create_ad(input.clone()).await.unwrap_err();
        assert!(matches!(err, AdError::Validation(_)));

        input.title = "Bike".to_string();
        input.price = -5.0;
        let err = f.service.create_ad(input).await.unwrap_err();
        assert!(matches!(err, AdError::Validation(_)));
    }

    #[tokio::test]
    async fn update_with_unknown_tag_leaves_ad_untouched() {
        let f = fixture().await;
        let created = f.service.create_ad(new_ad(&f, "Red Bike")).await.unwrap();

        let patch = AdPatch {
            title: Some("Renamed".to_string()),
            tag_ids: Some(vec![TagId::new(404)]),
            ..Default::default()
        };
        let err = f.service.update_ad(created.id, patch).await.unwrap_err();
        assert!(matches!(err, AdError::TagNotFound(_)));

        let unchanged = f.service.get_ad(created.id).await.unwrap();
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn update_replaces_tags_and_keeps_created_at() {
        let f = fixture().await;
        let created = f.service.create_ad(new_ad(&f, "Red Bike")).await.unwrap();

        let patch = AdPatch {
            price: Some(99.0),
            tag_ids: Some(Vec::new()),
            ..Default::default()
        };
        let updated = f.service.update_ad(created.id, patch).await.unwrap();

        assert!(updated.tags.is_empty());
        assert!((updated.price - 99.0).abs() < f64::EPSILON);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.title, "Red Bike");
    }

    #[tokio::test]
    async fn delete_returns_previous_state() {
        let f = fixture().await;
        let created = f.service.create_ad(new_ad(&f, "Red Bike")).await.unwrap();

        let deleted = f.service.delete_ad(created.id).await.unwrap();
        assert_eq!(deleted, created);

        let err = f.service.delete_ad(created.id).await.unwrap_err();
        assert!(matches!(err, AdError::NotFound(_)));
    }

    /// Deletes the ad right before the update lands, as a concurrent request would.
    struct VanishingRepository(crate::db::SeaOrmAdRepository);

    #[async_trait::async_trait]
    impl AdRepository for VanishingRepository {
        async fn find_by_id(&self, id: AdId) -> anyhow::Result<Option<AdRecord>> {
            self.0.find_by_id(id).await
        }

        async fn search_by_text(
            &self,
            query: &str,
            options: crate::models::ad::TextSearch,
        ) -> anyhow::Result<Vec<AdRecord>> {
            self.0.search_by_text(query, options).await
        }

        async fn list_recent(
            &self,
            category: Option<CategoryId>,
            limit: u64,
        ) -> anyhow::Result<Vec<AdRecord>> {
            self.0.list_recent(category, limit).await
        }

        async fn insert(&self, ad: &AdWrite) -> anyhow::Result<AdRecord> {
            self.0.insert(ad).await
        }

        async fn update(&self, ad: &AdWrite) -> anyhow::Result<Option<AdRecord>> {
            self.0.delete(ad.id).await?;
            self.0.update(ad).await
        }

        async fn delete(&self, id: AdId) -> anyhow::Result<bool> {
            self.0.delete(id).await
        }
    }

    #[tokio::test]
    async fn update_racing_a_delete_is_not_found_and_does_not_resurrect() {
        let f = fixture().await;
        let created = f.service.create_ad(new_ad(&f, "Red Bike")).await.unwrap();

        let ads: Arc<dyn AdRepository> = Arc::new(VanishingRepository(f.store.ad_repo()));
        let search = Arc::new(SearchService::new(
            ads.clone(),
            Arc::new(NoopCacheStore),
            &CacheConfig::default(),
            &SearchConfig::default(),
        ));
        let service = SeaOrmAdService::new(f.store.clone(), ads, search, 20);

        let patch = AdPatch {
            price: Some(10.0),
            ..Default::default()
        };
        let err = service.update_ad(created.id, patch).await.unwrap_err();
        assert!(matches!(err, AdError::NotFound(id) if id == created.id));
        assert_eq!(f.store.count_ads().await.unwrap(), 0);
    }
}
