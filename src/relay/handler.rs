//! The relay endpoint.
//!
//! One linear pass per request: credential, method, body, upstream, reply.
//! Every failure is terminal.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::error::Category;
use std::time::Instant;

use crate::http::{request_id, ApiError, AppState, RelayState};
use crate::observability::metrics;
use crate::relay::types::{GenerateRequest, GenerateResponse};
use crate::upstream::{types::error_details, GenerateContentRequest, UpstreamOutcome};

/// Relay a prompt and inline image to the upstream API.
pub async fn generate_image(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();

    let response = match relay(&state.inner, &method, &body, &request_id).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                tracing::error!(request_id = %request_id, status = %status, error = %err, "Relay request failed");
            } else {
                tracing::warn!(request_id = %request_id, status = %status, error = %err, "Relay request rejected");
            }
            err.into_response()
        }
    };

    let status = response.status();
    metrics::record_request(status.as_u16(), start);
    tracing::info!(
        request_id = %request_id,
        method = %method,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Relay request completed"
    );

    response
}

/// Describe a body parse failure by category and position only.
/// serde_json's own message can quote caller values, including image data.
fn body_error(e: &serde_json::Error) -> ApiError {
    let kind = match e.classify() {
        Category::Io => "unreadable body",
        Category::Syntax => "malformed JSON",
        Category::Data => "unexpected field type",
        Category::Eof => "unexpected end of input",
    };
    ApiError::InvalidBody(format!("{} at line {} column {}", kind, e.line(), e.column()))
}

async fn relay(
    state: &RelayState,
    method: &Method,
    body: &[u8],
    request_id: &str,
) -> Result<GenerateResponse, ApiError> {
    // Checked before anything about the request itself.
    let api_key = state.api_key.as_deref().ok_or(ApiError::MissingCredential)?;

    if *method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let request: GenerateRequest = serde_json::from_slice(body).map_err(|e| body_error(&e))?;
    let request = request.validate(&state.config.upstream.default_model)?;

    tracing::debug!(
        request_id = %request_id,
        model = %request.model,
        mime_type = %request.image.mime_type,
        image_bytes = request.image.data.len(),
        "Forwarding to upstream"
    );

    let payload = GenerateContentRequest::new(request.prompt, request.image);
    match state.upstream.generate(api_key, &request.model, &payload).await? {
        UpstreamOutcome::Image(image) => Ok(image.into()),
        UpstreamOutcome::NoImage(summary) => Err(ApiError::NoImage(summary)),
        UpstreamOutcome::Failed { status, body } => Err(ApiError::Upstream {
            status,
            details: error_details(&body),
        }),
    }
}
