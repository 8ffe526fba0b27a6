use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, ListAdsQuery, SearchAdsQuery};
use crate::api::validation::{parse_ad_id, validate_entity_id};
use crate::domain::CategoryId;
use crate::models::ad::{AdPatch, AdRecord, NewAd};
use crate::services::{AdError, AdService};

impl From<AdError> for ApiError {
    fn from(err: AdError) -> Self {
        match err {
            AdError::NotFound(id) => Self::not_found("Ad", id),
            AdError::OwnerNotFound(id) => Self::not_found("User", id),
            AdError::CategoryNotFound(id) => Self::not_found("Category", id),
            AdError::TagNotFound(id) => Self::not_found("Tag", id),
            AdError::Validation(msg) => Self::validation(msg),
            AdError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/ads?category_id=`
pub async fn list_ads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListAdsQuery>,
) -> Result<Json<ApiResponse<Vec<AdRecord>>>, ApiError> {
    let category = params
        .category_id
        .map(|id| validate_entity_id("category", id).map(CategoryId::new))
        .transpose()?;

    let ads = state.ad_service().list_ads(category).await?;
    Ok(Json(ApiResponse::success(ads)))
}

/// `GET /api/ads/search?q=`
pub async fn search_ads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchAdsQuery>,
) -> Result<Json<ApiResponse<Vec<AdRecord>>>, ApiError> {
    let ads = state.ad_service().search_ads(&params.q).await?;
    Ok(Json(ApiResponse::success(ads)))
}

pub async fn get_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AdRecord>>, ApiError> {
    let id = parse_ad_id(&id)?;
    let ad = state.ad_service().get_ad(id).await?;
    Ok(Json(ApiResponse::success(ad)))
}

pub async fn create_ad(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewAd>,
) -> Result<(StatusCode, Json<ApiResponse<AdRecord>>), ApiError> {
    let ad = state.ad_service().create_ad(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(ad))))
}

pub async fn update_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<AdPatch>,
) -> Result<Json<ApiResponse<AdRecord>>, ApiError> {
    let id = parse_ad_id(&id)?;
    let ad = state.ad_service().update_ad(id, patch).await?;
    Ok(Json(ApiResponse::success(ad)))
}

pub async fn delete_ad(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AdRecord>>, ApiError> {
    let id = parse_ad_id(&id)?;
    let ad = state.ad_service().delete_ad(id).await?;
    Ok(Json(ApiResponse::success(ad)))
}
