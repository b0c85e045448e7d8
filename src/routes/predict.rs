//! `POST /api/predict`: classify a feature triple without storing it.

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::IntoResponse, routing::post, Json,
    Router,
};
use serde_json::{Map, Value};

use super::{error_response, AppState};
use crate::validate;

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/predict", post(handler))
}

/// Omitted fields, or an empty body, take the default feature values.
async fn handler(State((_, classifier)): State<AppState>, body: Bytes) -> impl IntoResponse {
    // ---
    let payload = if body.iter().all(u8::is_ascii_whitespace) {
        Ok(Value::Object(Map::new()))
    } else {
        validate::parse_body(&body)
    };

    match payload.and_then(|p| validate::validate_features(&p)) {
        Ok(features) => (StatusCode::OK, Json(classifier.classify(&features))).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}
