//! System API endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use super::{ApiResponse, AppState, HealthResponse};

/// Reports database reachability and the active cache backend.
///
/// # Endpoint
/// `GET /api/system/health`
///
/// Answers 503 when the database ping fails. The cache is never probed here:
/// search keeps working without it.
pub async fn get_health(State(state): State<Arc<AppState>>) -> Response {
    let database = match state.store().ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let body = HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
        cache_backend: state.shared.cache.name(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION"),
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ApiResponse::success(body))).into_response()
}
