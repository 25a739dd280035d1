//! Caller-facing error responses.
//!
//! # Responsibilities
//! - Enumerate every way a relay request can fail
//! - Map each failure to its HTTP status and `{ error, details? }` body
//!
//! # Design Decisions
//! - Upstream failures keep the upstream status code
//! - Internal failures surface their message but never the credential

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::upstream::{NoImageSummary, UpstreamError};

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Errors returned to the relay caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Server configuration error: upstream API key is not set")]
    MissingCredential,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid model identifier: {0}")]
    InvalidModel(String),

    #[error("Upstream API request failed")]
    Upstream { status: StatusCode, details: Value },

    #[error("No image data in upstream response")]
    NoImage(NoImageSummary),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidBody(_) | ApiError::MissingFields(_) | ApiError::InvalidModel(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Upstream { status, .. } => *status,
            ApiError::NoImage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the JSON body for this error.
    pub fn body(&self) -> ErrorBody {
        let details = match self {
            ApiError::Upstream { details, .. } => Some(details.clone()),
            ApiError::NoImage(summary) => serde_json::to_value(summary).ok(),
            _ => None,
        };
        ErrorBody {
            error: self.to_string(),
            details,
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(e: UpstreamError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status(), Json(self.body())).into_response();
        if matches!(self, ApiError::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::MissingCredential.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::MissingFields(vec!["promptText"]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidModel("a/b".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NoImage(NoImageSummary::default()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_status_passes_through() {
        let err = ApiError::Upstream {
            status: StatusCode::TOO_MANY_REQUESTS,
            details: json!({ "error": { "message": "quota" } }),
        };
        assert_eq!(err.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(
            body,
            json!({
                "error": "Upstream API request failed",
                "details": { "error": { "message": "quota" } }
            })
        );
    }

    #[test]
    fn missing_fields_message_lists_all() {
        let err = ApiError::MissingFields(vec!["promptText", "image.mimeType"]);
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body, json!({ "error": "Missing required fields: promptText, image.mimeType" }));
    }

    #[test]
    fn method_not_allowed_sets_allow_header() {
        let response = ApiError::MethodNotAllowed.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }
}
