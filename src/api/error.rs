//! API error types with flat `{ "error": "..." }` JSON bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analysis::AnalysisError;
use crate::gate::Rejection;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

/// API-level errors with HTTP status mapping.
///
/// The 500 body never carries the analyzer's detail; the handler logs it
/// with the request id before converting.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid input")]
    InvalidInput,
    #[error("Input too short for analysis")]
    TooShort,
    #[error("Input unclear")]
    Unclear,
    #[error("AI analysis failed: {0}")]
    AnalysisFailed(#[from] AnalysisError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidInput => (StatusCode::BAD_REQUEST, "Invalid input"),
            ApiError::TooShort => (StatusCode::BAD_REQUEST, "Input too short for analysis"),
            ApiError::Unclear => (StatusCode::BAD_REQUEST, "Input unclear"),
            ApiError::AnalysisFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AI analysis failed"),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::InvalidInput => ApiError::InvalidInput,
            Rejection::TooShort => ApiError::TooShort,
            Rejection::Unclear => ApiError::Unclear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn rejections_map_to_400_with_wire_messages() {
        for rejection in [Rejection::InvalidInput, Rejection::TooShort, Rejection::Unclear] {
            let response = ApiError::from(rejection).into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert_eq!(json["error"], rejection.message());
        }
    }

    #[tokio::test]
    async fn analysis_failure_returns_500_without_details() {
        let err = AnalysisError::Service {
            status: 401,
            body: "API key not valid: AIza-secret".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "AI analysis failed"}));
    }
}
