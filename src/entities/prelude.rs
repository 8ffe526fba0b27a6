pub use super::ad_tags::Entity as AdTags;
pub use super::ads::Entity as Ads;
pub use super::categories::Entity as Categories;
pub use super::search_cache::Entity as SearchCache;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
