//! Wire types for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound payload: one user turn holding the prompt and the source image.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<RequestPart>,
}

/// A part in an upstream request - text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineImage,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<&'static str>,
}

/// Base64 image bytes plus MIME type, as carried inline in JSON bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

impl GenerateContentRequest {
    /// Build the payload for an image edit: prompt text followed by the image.
    pub fn new(prompt: impl Into<String>, image: InlineImage) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    RequestPart::Text {
                        text: prompt.into(),
                    },
                    RequestPart::InlineData { inline_data: image },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// What the upstream said instead of returning an image.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoImageSummary {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Take the first part carrying non-empty inline data, searching candidates in order.
    pub fn into_image(self) -> Result<InlineImage, NoImageSummary> {
        let mut summary = NoImageSummary {
            block_reason: self.prompt_feedback.and_then(|f| f.block_reason),
            ..Default::default()
        };

        for candidate in self.candidates {
            if summary.finish_reason.is_none() {
                summary.finish_reason = candidate.finish_reason;
            }
            let Some(content) = candidate.content else {
                continue;
            };
            for part in content.parts {
                match part.inline_data {
                    Some(image) if !image.data.is_empty() => return Ok(image),
                    _ => {}
                }
                if let Some(text) = part.text {
                    summary.text.push(text);
                }
            }
        }

        Err(summary)
    }
}

/// Render an upstream error body for the caller: JSON when it parses, raw text otherwise.
pub fn error_details(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
