pub mod search;
pub use search::{SearchError, SearchService};

pub mod ad_service;
pub mod ad_service_impl;
pub use ad_service::{AdError, AdService};
pub use ad_service_impl::SeaOrmAdService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
