use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::TagId;
use crate::entities::{prelude::*, tags};
use crate::models::catalog::Tag;

impl From<tags::Model> for Tag {
    fn from(model: tags::Model) -> Self {
        Self {
            id: TagId::new(model.id),
            name: model.name,
        }
    }
}

pub struct TagRepository {
    conn: DatabaseConnection,
}

impl TagRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Tag>> {
        let rows = Tags::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    pub async fn get(&self, id: TagId) -> Result<Option<Tag>> {
        let row = Tags::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query tag by ID")?;

        Ok(row.map(Tag::from))
    }

    /// Returns the tags that exist among `ids`, ordered by id. Missing ids are
    /// simply absent from the result.
    pub async fn get_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = Tags::find()
            .filter(tags::Column::Id.is_in(ids.iter().map(TagId::value)))
            .order_by_asc(tags::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    pub async fn create(&self, name: &str) -> Result<Tag> {
        let model = tags::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert tag")?;

        Ok(model.into())
    }
}
