pub mod ad;
pub mod cache;
pub mod category;
pub mod tag;
pub mod user;
