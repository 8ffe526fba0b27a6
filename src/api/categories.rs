use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CreateNamedRequest};
use crate::api::validation::validate_entity_id;
use crate::domain::{CategoryId, TagId};
use crate::models::catalog::{Category, Tag};
use crate::services::{CatalogError, CatalogService};

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CategoryNotFound(id) => Self::not_found("Category", id),
            CatalogError::TagNotFound(id) => Self::not_found("Tag", id),
            CatalogError::Validation(msg) => Self::validation(msg),
            CatalogError::Conflict(msg) => Self::Conflict(msg),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ApiError> {
    let categories = state.catalog_service().list_categories().await?;
    Ok(Json(ApiResponse::success(categories)))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Category>>, ApiError> {
    let id = validate_entity_id("category", id)?;
    let category = state
        .catalog_service()
        .get_category(CategoryId::new(id))
        .await?;
    Ok(Json(ApiResponse::success(category)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateNamedRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Category>>), ApiError> {
    let category = state
        .catalog_service()
        .create_category(&request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))))
}

pub async fn list_tags(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Tag>>>, ApiError> {
    let tags = state.catalog_service().list_tags().await?;
    Ok(Json(ApiResponse::success(tags)))
}

pub async fn get_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Tag>>, ApiError> {
    let id = validate_entity_id("tag", id)?;
    let tag = state.catalog_service().get_tag(TagId::new(id)).await?;
    Ok(Json(ApiResponse::success(tag)))
}

pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateNamedRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tag>>), ApiError> {
    let tag = state.catalog_service().create_tag(&request.name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(tag))))
}
