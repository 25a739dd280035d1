//! Caller-facing request and response shapes.

use serde::{Deserialize, Serialize};

use crate::http::ApiError;
use crate::upstream::InlineImage;

/// Inbound body. Every field is optional here so that absence can be
/// reported as a 400 listing the missing fields rather than a parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt_text: Option<String>,
    #[serde(default)]
    pub image: Option<ImageInput>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// A request that passed presence checks, ready to forward.
#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub prompt: String,
    pub image: InlineImage,
    pub model: String,
}

/// Successful relay reply.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub base64_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl From<InlineImage> for GenerateResponse {
    fn from(image: InlineImage) -> Self {
        Self {
            base64_data: image.data,
            mime_type: Some(image.mime_type).filter(|m| !m.is_empty()),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Model identifiers end up in the upstream URL path.
fn is_valid_model(model: &str) -> bool {
    model
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl GenerateRequest {
    /// Check required fields and resolve the model.
    pub fn validate(self, default_model: &str) -> Result<ValidatedRequest, ApiError> {
        let prompt = present(self.prompt_text);
        let image = self.image.unwrap_or_default();
        let data = present(image.data);
        let mime_type = present(image.mime_type);

        let (prompt, data, mime_type) = match (prompt, data, mime_type) {
            (Some(p), Some(d), Some(m)) => (p, d, m),
            (p, d, m) => {
                let mut missing = Vec::new();
                if p.is_none() {
                    missing.push("promptText");
                }
                if d.is_none() {
                    missing.push("image.data");
                }
                if m.is_none() {
                    missing.push("image.mimeType");
                }
                return Err(ApiError::MissingFields(missing));
            }
        };

        let model = present(self.model).unwrap_or_else(|| default_model.to_string());
        if !is_valid_model(&model) {
            return Err(ApiError::InvalidModel(model));
        }

        Ok(ValidatedRequest {
            prompt,
            image: InlineImage { mime_type, data },
            model,
        })
    }
}
