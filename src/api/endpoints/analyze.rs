//! `POST /api/analyze-symptoms`: gate free text, then dispatch it.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, NeedsMoreInfoBody};
use crate::gate::Screening;

/// Screen the body through the admissibility gate and forward admitted
/// text to the analyzer.
///
/// Bodies not sent as `application/json` are read as empty, so they fail
/// the shape guard. Hard gate failures are 400s, soft ones are 200 with
/// `status: "needs_more_info"`. The analyzer result is returned verbatim.
/// If the client goes away the handler future is dropped, cancelling the
/// in-flight analyzer call with it.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    let input = match ctx.gate.screen_request(content_type, &body) {
        Screening::Dispatch(input) => input,
        Screening::Rejected(rejection) => {
            tracing::info!(
                %request_id,
                stage = rejection.stage().as_str(),
                reason = rejection.message(),
                body_bytes = body.len(),
                "Symptom input rejected"
            );
            return Err(rejection.into());
        }
        Screening::NeedsMoreInfo(guidance) => {
            tracing::info!(
                %request_id,
                stage = guidance.stage().as_str(),
                body_bytes = body.len(),
                "Symptom input needs more detail"
            );
            return Ok(Json(NeedsMoreInfoBody::new(guidance.message())).into_response());
        }
    };

    tracing::info!(
        %request_id,
        analyzer = ctx.analyzer.name(),
        locale = %input.locale,
        text_chars = input.text.chars().count(),
        "Symptom input admitted, dispatching"
    );

    let result = ctx
        .analyzer
        .analyze(&input.text, &input.locale)
        .await
        .inspect_err(|e| tracing::error!(%request_id, error = %e, "Analyzer call failed"))?;

    Ok(Json(result).into_response())
}
