use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::classifier::ClassifierLoader;
use crate::store::ReadingStore;

mod health;
mod model;
mod predict;
mod readings;
mod sensor_data;
mod stats;

// ---

/// Shared state handed to every handler.
pub type AppState = (ReadingStore, Arc<ClassifierLoader>);

pub fn router(store: ReadingStore, classifier: Arc<ClassifierLoader>) -> Router {
    // ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(sensor_data::router())
        .merge(readings::router())
        .merge(stats::router())
        .merge(predict::router())
        .merge(model::router())
        .merge(health::router())
        .layer(cors)
        .with_state((store, classifier))
}

/// JSON error body: `{"error": "..."}`.
fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}
