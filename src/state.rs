use std::sync::Arc;

use crate::cache::{CacheStore, build_cache_store};
use crate::config::Config;
use crate::db::Store;
use crate::ports::AdRepository;
use crate::services::{
    AdService, CatalogService, SeaOrmAdService, SeaOrmCatalogService, SeaOrmUserService,
    SearchService, UserService,
};

/// Everything built once at startup and shared by the HTTP layer and the CLI.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    /// Process-wide cache handle. Backends connect lazily on first use.
    pub cache: Arc<dyn CacheStore>,

    pub search_service: Arc<SearchService>,

    pub ad_service: Arc<dyn AdService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let cache = build_cache_store(&config.cache, &store)?;
        Ok(Self::assemble(config, store, cache))
    }

    /// Wires the services around an existing store and cache.
    #[must_use]
    pub fn assemble(config: Config, store: Store, cache: Arc<dyn CacheStore>) -> Self {
        let ads: Arc<dyn AdRepository> = Arc::new(store.ad_repo());

        let search_service = Arc::new(SearchService::new(
            ads.clone(),
            cache.clone(),
            &config.cache,
            &config.search,
        ));

        let store_arc = Arc::new(store.clone());
        let ad_service = Arc::new(SeaOrmAdService::new(
            store_arc.clone(),
            ads,
            search_service.clone(),
            config.search.listing_limit,
        )) as Arc<dyn AdService>;

        let catalog_service =
            Arc::new(SeaOrmCatalogService::new(store_arc.clone())) as Arc<dyn CatalogService>;
        let user_service = Arc::new(SeaOrmUserService::new(store_arc)) as Arc<dyn UserService>;

        Self {
            config: Arc::new(config),
            store,
            cache,
            search_service,
            ad_service,
            catalog_service,
            user_service,
        }
    }
}
