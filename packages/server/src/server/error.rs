//! Mapping of curation failures to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use source_curation::CurationError;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub CurationError);

impl From<CurationError> for ApiError {
    fn from(err: CurationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let (status, body) = match &self.0 {
            CurationError::InvalidInput { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": field }),
            ),
            CurationError::NoSources { stage, .. } => {
                tracing::warn!(stage = %stage, error = %message, "Pipeline produced no sources");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": message, "stage": stage }),
                )
            }
            _ => {
                tracing::error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_curation::Stage;

    #[test]
    fn test_status_mapping() {
        let invalid = ApiError(CurationError::invalid("subject", "must not be empty"));
        assert_eq!(invalid.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let empty = ApiError(CurationError::NoSources {
            stage: Stage::Discovery,
            reason: "no strategy produced a candidate".to_string(),
        });
        assert_eq!(empty.into_response().status(), StatusCode::BAD_GATEWAY);

        let storage = ApiError(CurationError::Storage(std::io::Error::other("disk full")));
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
