//! HTTP router.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS (permissive) → 2. Audit logger → Handler

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::analysis::SymptomAnalyzer;
use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::gate::AdmissibilityGate;

/// Build the service router from its collaborators.
pub fn api_router(gate: AdmissibilityGate, analyzer: Arc<dyn SymptomAnalyzer>) -> Router {
    build_router(ApiContext::new(gate, analyzer))
}

fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze-symptoms", post(endpoints::analyze::analyze));

    Router::new()
        .route("/", get(endpoints::health::root))
        .nest("/api", api)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::analysis::mock::MockAnalyzer;
    use crate::gate::{GateConfig, ValidityPolicy, Vocabulary};

    fn router_with(policy: ValidityPolicy, analyzer: MockAnalyzer) -> Router {
        let gate = AdmissibilityGate::new(
            GateConfig::for_policy(policy),
            Vocabulary::bundled().unwrap(),
        );
        api_router(gate, Arc::new(analyzer))
    }

    fn verdict() -> serde_json::Value {
        serde_json::json!({
            "urgency": "moderate",
            "label": "Moderate",
            "color": "yellow",
            "possibleConditions": [{"name": "Tension Headache", "tag": "Headaches"}]
        })
    }

    fn analyze_request(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/analyze-symptoms")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn send(app: Router, body: serde_json::Value) -> Response {
        app.oneshot(analyze_request(body.to_string())).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // =================================================================
    // HARD FAILURES (400)
    // =================================================================

    #[tokio::test]
    async fn missing_text_is_invalid_input() {
        let mock = MockAnalyzer::returning(verdict());
        let response = send(router_with(ValidityPolicy::Lenient, mock.clone()), serde_json::json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, serde_json::json!({"error": "Invalid input"}));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn non_string_text_is_invalid_input() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::returning(verdict()));
        let response = send(app, serde_json::json!({"text": 42})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid input");
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_input() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::returning(verdict()));
        let response = app.oneshot(analyze_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid input");
    }

    #[tokio::test]
    async fn plain_text_body_is_invalid_and_never_dispatched() {
        let mock = MockAnalyzer::returning(verdict());
        let app = router_with(ValidityPolicy::Lenient, mock.clone());
        let body = serde_json::json!({
            "text": "severe headache in my left temple for the last three days"
        });
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/analyze-symptoms")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, serde_json::json!({"error": "Invalid input"}));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_content_type_is_invalid() {
        let mock = MockAnalyzer::returning(verdict());
        let app = router_with(ValidityPolicy::Lenient, mock.clone());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/analyze-symptoms")
            .body(Body::from(r#"{"text":"sharp pain in my knee since yesterday"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn short_text_is_too_short() {
        let app = router_with(ValidityPolicy::Strict, MockAnalyzer::returning(verdict()));
        let response = send(app, serde_json::json!({"text": "  fever  "})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"error": "Input too short for analysis"})
        );
    }

    #[tokio::test]
    async fn strict_policy_rejects_noise_as_unclear() {
        let mock = MockAnalyzer::returning(verdict());
        let app = router_with(ValidityPolicy::Strict, mock.clone());
        let response = send(app, serde_json::json!({"text": "asdkj qwopx zxcvb"})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, serde_json::json!({"error": "Input unclear"}));
        assert_eq!(mock.call_count(), 0);
    }

    // =================================================================
    // SOFT FAILURES (200 + needs_more_info)
    // =================================================================

    #[tokio::test]
    async fn lenient_policy_asks_for_clearer_wording() {
        let mock = MockAnalyzer::returning(verdict());
        let app = router_with(ValidityPolicy::Lenient, mock.clone());
        let response = send(app, serde_json::json!({"text": "ssssss ssssss ssssss"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "needs_more_info");
        assert_eq!(json["message"], crate::gate::Guidance::UnclearWording.message());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn lone_symptom_needs_more_info() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::returning(verdict()));
        let response = send(app, serde_json::json!({"text": "I have a headache"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "needs_more_info");
        assert_eq!(json["message"], crate::gate::Guidance::MissingMedicalDetail.message());
    }

    #[tokio::test]
    async fn single_category_gets_structural_message() {
        let app = router_with(ValidityPolicy::Strict, MockAnalyzer::returning(verdict()));
        let response = send(app, serde_json::json!({"text": "pain pain pain pain pain"})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "needs_more_info");
        assert_eq!(json["message"], crate::gate::Guidance::IncompleteDescription.message());
    }

    // =================================================================
    // DISPATCH
    // =================================================================

    #[tokio::test]
    async fn admitted_text_is_dispatched_and_passed_through() {
        let mock = MockAnalyzer::returning(verdict());
        let app = router_with(ValidityPolicy::Lenient, mock.clone());
        let text = "severe headache in my left temple for the last three days";
        let response = send(app, serde_json::json!({"text": text})).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, verdict());

        let calls = mock.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (text.to_string(), "en".to_string()));
    }

    #[tokio::test]
    async fn locale_is_forwarded() {
        let mock = MockAnalyzer::returning(verdict());
        let app = router_with(ValidityPolicy::Lenient, mock.clone());
        let response = send(
            app,
            serde_json::json!({"text": "sharp pain in my knee since yesterday", "locale": "hi"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mock.calls.lock().unwrap()[0].1, "hi");
    }

    #[tokio::test]
    async fn analyzer_failure_is_generic_500() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::failing());
        let response = send(
            app,
            serde_json::json!({"text": "sharp pain in my knee since yesterday"}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json, serde_json::json!({"error": "AI analysis failed"}));
    }

    // =================================================================
    // HOUSEKEEPING ROUTES
    // =================================================================

    #[tokio::test]
    async fn root_says_ok() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::returning(verdict()));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), 16).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn health_reports_policy_and_analyzer() {
        let app = router_with(ValidityPolicy::Strict, MockAnalyzer::returning(verdict()));
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["policy"], "strict");
        assert_eq!(json["analyzer"], "mock");
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::returning(verdict()));
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/analyze-symptoms")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn get_on_analyze_is_not_allowed() {
        let app = router_with(ValidityPolicy::Lenient, MockAnalyzer::returning(verdict()));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/analyze-symptoms")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
