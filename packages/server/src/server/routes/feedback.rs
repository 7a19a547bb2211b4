//! Quality feedback endpoints.

use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;
use source_curation::feedback::{DEFAULT_LOOKBACK_DAYS, MAX_LOOKBACK_DAYS};
use source_curation::{
    BiographyQuality, CurationError, Dashboard, FeedbackRecommendations, ImprovementMetrics,
    SourceCandidate, SuccessCase,
};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LearnRequest {
    pub subject: String,
    #[serde(default)]
    pub sources: Vec<SourceCandidate>,
    pub quality: BiographyQuality,
}

#[derive(Debug, Deserialize)]
pub struct MetricsParams {
    pub lookback_days: Option<i64>,
}

/// POST /api/feedback/learn
pub async fn learn_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<LearnRequest>,
) -> Result<Json<SuccessCase>, ApiError> {
    let case = state
        .pipeline
        .learn(&request.subject, &request.sources, &request.quality)?;
    Ok(Json(case))
}

/// GET /api/feedback/metrics?lookback_days=
pub async fn metrics_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<MetricsParams>,
) -> Result<Json<ImprovementMetrics>, ApiError> {
    let lookback = params.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
    if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback) {
        return Err(CurationError::invalid(
            "lookback_days",
            format!("must be between 1 and {}", MAX_LOOKBACK_DAYS),
        )
        .into());
    }
    Ok(Json(state.pipeline.feedback().improvement_metrics(lookback)))
}

/// GET /api/feedback/recommendations
pub async fn recommendations_handler(
    Extension(state): Extension<AppState>,
) -> Json<FeedbackRecommendations> {
    Json(state.pipeline.feedback().recommendations())
}

/// GET /api/feedback/dashboard
pub async fn dashboard_handler(Extension(state): Extension<AppState>) -> Json<Dashboard> {
    Json(state.pipeline.feedback().dashboard())
}
