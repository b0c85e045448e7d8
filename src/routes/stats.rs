//! `GET /api/stats`: point-in-time statistics snapshot.

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use chrono::Utc;
use tracing::error;

use super::{error_response, AppState};
use crate::stats;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/stats", get(handler))
}

async fn handler(State((store, classifier)): State<AppState>) -> impl IntoResponse {
    // ---
    match stats::compute_stats(&store, &classifier, Utc::now()).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => {
            error!("GET /api/stats - {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to compute statistics")
        }
    }
}
