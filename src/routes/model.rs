//! `POST /api/model/reload`: explicit trigger to reload the classifier.
//!
//! This is the only way the active model changes while the process runs.

use std::sync::Arc;

use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use serde::Serialize;
use tracing::{error, warn};

use super::{error_response, AppState};
use crate::classifier::ModelInfo;

// ---

#[derive(Serialize)]
struct ReloadResponse {
    status: &'static str,
    generation: u64,
    model: ModelInfo,
}

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/model/reload", post(handler))
}

/// Artifacts are read off the async runtime. A failed reload keeps the model
/// that was active before.
async fn handler(State((_, classifier)): State<AppState>) -> impl IntoResponse {
    // ---
    let loader = Arc::clone(&classifier);
    let outcome = tokio::task::spawn_blocking(move || loader.reload()).await;

    match outcome {
        Ok(Ok(generation)) => (
            StatusCode::OK,
            Json(ReloadResponse {
                status: "ok",
                generation,
                model: classifier.model_info(),
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!("POST /api/model/reload - {e}");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        Err(e) => {
            error!("POST /api/model/reload - reload task failed: {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Model reload failed")
        }
    }
}
