use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_ads_category_created_at")
                    .table(Ads::Table)
                    .col(Ads::CategoryId)
                    .col(Ads::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ads_created_at")
                    .table(Ads::Table)
                    .col(Ads::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ads_created_at")
                    .table(Ads::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_ads_category_created_at")
                    .table(Ads::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Ads {
    Table,
    CategoryId,
    CreatedAt,
}
