use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::validation::validate_entity_id;
use crate::domain::UserId;
use crate::models::user::{NewUser, User};
use crate::services::{UserError, UserService};

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::not_found("User", id),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Conflict(msg) => Self::Conflict(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<User>>>, ApiError> {
    let users = state.user_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let id = validate_entity_id("user", id)?;
    let user = state.user_service().get_user(UserId::new(id)).await?;
    Ok(Json(ApiResponse::success(user)))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), ApiError> {
    let user = state.user_service().create_user(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}
