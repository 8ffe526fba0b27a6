pub mod ad;
pub mod catalog;
pub mod user;
