use sea_orm_migration::prelude::*;

mod m20240601_initial;
mod m20240608_add_search_cache;
mod m20240615_add_ads_created_at_index;
mod m20240622_add_ads_search_text;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_initial::Migration),
            Box::new(m20240608_add_search_cache::Migration),
            Box::new(m20240615_add_ads_created_at_index::Migration),
            Box::new(m20240622_add_ads_search_text::Migration),
        ]
    }
}
