//! mpp-ps library - Prediction Service module
//!
//! Serves the microplastic concentration prediction API and its web form.
//! The fitted scaler and model are loaded once at startup into an
//! [`InferencePipeline`]; every handler borrows that shared pipeline
//! through [`AppState`].

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use mpp_common::InferencePipeline;

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded scaler + model pair, shared across requests
    pub pipeline: Arc<InferencePipeline>,
    /// Process start time, reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state around an initialized pipeline
    pub fn new(pipeline: Arc<InferencePipeline>) -> Self {
        Self {
            pipeline,
            started_at: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;

    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/api/predict", post(api::predict))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        // Request/response logging through the tracing subscriber
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .with_state(state)
}
