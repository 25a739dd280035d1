//! HTTP client for the upstream generation API.
//!
//! # Responsibilities
//! - Own the pooled `reqwest::Client` with connect/request deadlines
//! - Send the credential as a header, never in the URL
//! - Classify the reply: failed status, image, or success without image
//!
//! Nothing here retries; every outcome is handed back to the caller as-is.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::upstream::types::{GenerateContentRequest, GenerateContentResponse, InlineImage, NoImageSummary};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors that stop the upstream exchange before a usable reply exists.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Could not build the HTTP client.
    #[error("failed to build upstream client: {0}")]
    Build(#[source] reqwest::Error),

    /// Connection, TLS or timeout failure.
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// 2xx reply whose body could not be decoded.
    #[error("invalid upstream response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Classified result of a completed upstream exchange.
#[derive(Debug)]
pub enum UpstreamOutcome {
    /// Upstream answered with inline image data.
    Image(InlineImage),
    /// Upstream succeeded but returned no inline image.
    NoImage(NoImageSummary),
    /// Upstream answered with a non-success status.
    Failed { status: StatusCode, body: String },
}

/// Client for the `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs));
        if !upstream.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build().map_err(UpstreamError::Build)?;

        Ok(Self {
            http,
            base_url: upstream.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Send one generation request and classify the reply.
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        payload: &GenerateContentRequest,
    ) -> Result<UpstreamOutcome, UpstreamError> {
        let start = Instant::now();

        let result = self
            .http
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(payload)
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream(None, start);
                return Err(UpstreamError::Transport(e));
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(UpstreamError::Transport)?;
        metrics::record_upstream(Some(status.as_u16()), start);

        tracing::debug!(
            model = %model,
            status = %status,
            body_bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream replied"
        );

        if !status.is_success() {
            return Ok(UpstreamOutcome::Failed { status, body });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(UpstreamError::Decode)?;
        Ok(match parsed.into_image() {
            Ok(image) => UpstreamOutcome::Image(image),
            Err(summary) => UpstreamOutcome::NoImage(summary),
        })
    }
}
