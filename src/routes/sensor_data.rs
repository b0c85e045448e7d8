//! `POST /api/sensor-data`: ingest one reading from a device.

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::IntoResponse, routing::post, Json,
    Router,
};
use tracing::{error, info};

use super::{error_response, AppState};
use crate::error::IngestError;
use crate::pipeline::{self, IngestResponse};
use crate::validate;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/sensor-data", post(handler))
}

/// The body is parsed as JSON whatever the declared content type.
async fn handler(State((store, classifier)): State<AppState>, body: Bytes) -> impl IntoResponse {
    // ---
    let payload = match validate::parse_body(&body) {
        Ok(payload) => payload,
        Err(e) => {
            info!("POST /api/sensor-data - rejected: {e}");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match pipeline::ingest(&store, &classifier, &payload).await {
        Ok((_, classification)) => {
            (StatusCode::OK, Json(IngestResponse::from(classification))).into_response()
        }
        Err(IngestError::Validation(e)) => {
            info!("POST /api/sensor-data - rejected: {e}");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Err(e @ IngestError::Store(_)) => {
            error!("POST /api/sensor-data - {e}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store reading")
        }
    }
}
