use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::db::repositories::ad::search_text;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Ads::Table)
                    .add_column(
                        ColumnDef::new(Ads::SearchText)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // SQLite cannot fold non-ASCII case, so existing rows are backfilled here
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        let select = Query::select()
            .columns([Ads::Id, Ads::Title, Ads::Description])
            .from(Ads::Table)
            .to_owned();

        for row in db.query_all(backend.build(&select)).await? {
            let id: Uuid = row.try_get("", "id")?;
            let title: String = row.try_get("", "title")?;
            let description: String = row.try_get("", "description")?;

            let update = Query::update()
                .table(Ads::Table)
                .value(Ads::SearchText, search_text(&title, &description))
                .and_where(Expr::col(Ads::Id).eq(id))
                .to_owned();
            db.execute(backend.build(&update)).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Ads::Table)
                    .drop_column(Ads::SearchText)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Ads {
    Table,
    Id,
    Title,
    Description,
    SearchText,
}
