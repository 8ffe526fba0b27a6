//! Domain service for marketplace users (ad owners).

use thiserror::Error;

use crate::constants::limits::MAX_NAME_LENGTH;
use crate::domain::UserId;
use crate::models::user::{NewUser, User};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for UserError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// # Errors
    ///
    /// - [`UserError::Validation`] if the email has no `@` or a name is too long
    /// - [`UserError::Conflict`] if the email is already registered
    async fn create_user(&self, input: NewUser) -> Result<User, UserError>;

    async fn get_user(&self, id: UserId) -> Result<User, UserError>;

    async fn list_users(&self) -> Result<Vec<User>, UserError>;
}

/// Trims every field and checks the email shape.
pub(crate) fn normalize_new_user(input: NewUser) -> Result<NewUser, UserError> {
    let email = input.email.trim().to_string();
    if !email.contains('@') {
        return Err(UserError::Validation(format!("Invalid email: '{email}'")));
    }

    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();
    if first_name.chars().count() > MAX_NAME_LENGTH || last_name.chars().count() > MAX_NAME_LENGTH
    {
        return Err(UserError::Validation(format!(
            "Names must be {MAX_NAME_LENGTH} characters or less"
        )));
    }

    Ok(NewUser {
        email,
        first_name,
        last_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_needs_an_at_sign() {
        let input = NewUser {
            email: " sam@example.com ".to_string(),
            first_name: "Sam".to_string(),
            last_name: "Seller".to_string(),
        };
        assert_eq!(normalize_new_user(input.clone()).unwrap().email, "sam@example.com");

        let bad = NewUser {
            email: "sam.example.com".to_string(),
            ..input
        };
        assert!(matches!(normalize_new_user(bad), Err(UserError::Validation(_))));
    }
}
