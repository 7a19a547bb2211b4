//! Application setup and router construction.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use source_curation::CurationPipeline;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    analyze_handler, automatic_handler, cross_validate_handler, dashboard_handler,
    health_handler, hybrid_handler, learn_handler, metrics_handler, recommendations_handler,
    validate_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CurationPipeline>,
}

impl AppState {
    pub fn new(pipeline: CurationPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the Axum application router
pub fn build_app(pipeline: CurationPipeline) -> Router {
    let app_state = AppState::new(pipeline);

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        // Source curation
        .route("/api/sources/automatic", post(automatic_handler))
        .route("/api/sources/hybrid", post(hybrid_handler))
        .route("/api/sources/validate", post(validate_handler))
        .route("/api/sources/cross-validate", post(cross_validate_handler))
        .route("/api/sources/analyze", post(analyze_handler))
        // Quality feedback
        .route("/api/feedback/learn", post(learn_handler))
        .route("/api/feedback/metrics", get(metrics_handler))
        .route("/api/feedback/recommendations", get(recommendations_handler))
        .route("/api/feedback/dashboard", get(dashboard_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
