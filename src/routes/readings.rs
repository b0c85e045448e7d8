//! Read-side endpoints over the reading log: latest readings and devices.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, error, warn};

use super::{error_response, AppState};

// ---

const DEFAULT_LIMIT: u32 = 50;

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/latest", get(latest))
        .route("/api/devices", get(devices))
}

/// Query parameters for `/api/latest`
#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    device_id: Option<String>,
    limit: Option<u32>,
}

async fn latest(
    query: Result<Query<LatestQuery>, QueryRejection>,
    State((store, _)): State<AppState>,
) -> impl IntoResponse {
    // ---
    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!("GET /api/latest - {rejection}");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    debug!("GET /api/latest - {:?}", params);

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    match store.latest(params.device_id.as_deref(), limit).await {
        Ok(readings) => (StatusCode::OK, Json(readings)).into_response(),
        Err(e) => {
            error!("GET /api/latest - {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch readings")
        }
    }
}

async fn devices(State((store, _)): State<AppState>) -> impl IntoResponse {
    // ---
    match store.distinct_devices().await {
        Ok(devices) => (StatusCode::OK, Json(devices)).into_response(),
        Err(e) => {
            error!("GET /api/devices - {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch devices")
        }
    }
}
