use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::db::now_timestamp;
use crate::domain::CategoryId;
use crate::entities::{categories, prelude::*};
use crate::models::catalog::Category;

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: CategoryId::new(model.id),
            name: model.name,
            created_at: model.created_at,
        }
    }
}

pub struct CategoryRepository {
    conn: DatabaseConnection,
}

impl CategoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        let rows = Categories::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = Categories::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query category by ID")?;

        Ok(row.map(Category::from))
    }

    /// Fails with a unique constraint error when the name is taken.
    pub async fn create(&self, name: &str) -> Result<Category> {
        let model = categories::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now_timestamp()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert category")?;

        Ok(model.into())
    }
}
