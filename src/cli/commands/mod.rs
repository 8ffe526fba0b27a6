mod list;
mod search;

pub use list::cmd_list_ads;
pub use search::cmd_search_ads;
