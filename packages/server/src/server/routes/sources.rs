//! Source generation, validation and analysis endpoints.

use axum::{extract::Extension, Json};
use serde::Deserialize;
use source_curation::validation::DEFAULT_MAX_CONTENT_LENGTH;
use source_curation::{
    AdvancedValidationResponse, AutomaticRequest, AutomaticResponse, ContentQualityScore,
    HybridRequest, HybridResponse, SourceCandidate, ValidationOptions, ValidationResult,
};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub subject: String,
    pub sources: Vec<SourceCandidate>,
    #[serde(flatten)]
    pub options: ValidationOptions,
}

#[derive(Debug, Deserialize)]
pub struct CrossValidateRequest {
    pub subject: String,
    pub sources: Vec<SourceCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    pub subject: String,
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

/// POST /api/sources/automatic
pub async fn automatic_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<AutomaticRequest>,
) -> Result<Json<AutomaticResponse>, ApiError> {
    Ok(Json(state.pipeline.generate_automatic(request).await?))
}

/// POST /api/sources/hybrid
pub async fn hybrid_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<HybridRequest>,
) -> Result<Json<HybridResponse>, ApiError> {
    Ok(Json(state.pipeline.generate_hybrid(request).await?))
}

/// POST /api/sources/validate
pub async fn validate_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Result<Json<AdvancedValidationResponse>, ApiError> {
    let response = state
        .pipeline
        .validate_advanced(&request.subject, request.sources, &request.options)
        .await?;
    Ok(Json(response))
}

/// POST /api/sources/cross-validate
pub async fn cross_validate_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CrossValidateRequest>,
) -> Result<Json<ValidationResult>, ApiError> {
    let result = state
        .pipeline
        .cross_validate(&request.sources, &request.subject)
        .await?;
    Ok(Json(result))
}

/// POST /api/sources/analyze
pub async fn analyze_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ContentQualityScore>, ApiError> {
    let score = state
        .pipeline
        .analyze_content(&request.url, &request.subject, request.max_length)
        .await?;
    Ok(Json(score))
}
