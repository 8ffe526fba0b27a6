pub mod prelude;

pub mod ad_tags;
pub mod ads;
pub mod categories;
pub mod search_cache;
pub mod tags;
pub mod users;
