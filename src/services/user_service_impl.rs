//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;
use tracing::info;

use crate::db::{Store, is_unique_violation};
use crate::domain::UserId;
use crate::models::user::{NewUser, User};
use crate::services::user_service::{UserError, UserService, normalize_new_user};

pub struct SeaOrmUserService {
    store: Arc<Store>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl UserService for SeaOrmUserService {
    async fn create_user(&self, input: NewUser) -> Result<User, UserError> {
        let input = normalize_new_user(input)?;

        let user = self.store.create_user(&input).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::Conflict(format!("Email '{}' is already registered", input.email))
            } else {
                UserError::from(e)
            }
        })?;

        info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.store
            .get_user(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        Ok(self.store.list_users().await?)
    }
}
