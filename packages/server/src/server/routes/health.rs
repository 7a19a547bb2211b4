use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    feedback: FeedbackHealth,
}

#[derive(Serialize)]
pub struct FeedbackHealth {
    cases: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

/// Health check endpoint
///
/// Reports the crate version and the size of the feedback store.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let feedback = state.pipeline.feedback();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        feedback: FeedbackHealth {
            cases: feedback.len(),
            path: feedback.path().map(|p| p.display().to_string()),
        },
    })
}
