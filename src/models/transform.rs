use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SnapmorphError};
use crate::models::SourceImage;

/// Prompts above this length are rejected before any external call.
pub const MAX_PROMPT_CHARS: usize = 2000;

/// The dispatch control is enabled iff an image is present and the prompt
/// is not blank.
pub fn dispatchable(has_image: bool, prompt: &str) -> bool {
    has_image && !prompt.trim().is_empty()
}

/// One validated prompt + image pair, consumed by a single model call.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    pub prompt: String,
    pub image: SourceImage,
}

impl TransformRequest {
    pub fn new(prompt: impl Into<String>, image: SourceImage) -> Self {
        Self {
            prompt: prompt.into(),
            image,
        }
    }

    /// Input errors caught here never reach the external API.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(SnapmorphError::InvalidInput(
                "Please describe what you want to do with the photo".into(),
            ));
        }
        if self.prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(SnapmorphError::InvalidInput(format!(
                "Prompt is too long ({} characters; the maximum is {})",
                self.prompt.chars().count(),
                MAX_PROMPT_CHARS,
            )));
        }
        Ok(())
    }
}

/// A successful transformation, normalized to a single result locator.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResponse {
    pub result_url: String,
    pub model: String,
}

/// Resolves the model's two-shape `output` value into one locator string.
/// The API is not guaranteed to return a uniform representation: it may be
/// a plain URL string, a list of URLs, or an object carrying a `url`
/// field. Every later use site sees the normalized form only.
pub fn normalize_output(output: &Value) -> Result<String> {
    match output {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::Array(items) => items
            .iter()
            .find_map(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                SnapmorphError::UnexpectedResponse("output list holds no URL".into())
            }),
        Value::Object(map) => map
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                SnapmorphError::UnexpectedResponse("output object carries no url field".into())
            }),
        _ => Err(SnapmorphError::UnexpectedResponse(format!(
            "output has no usable locator: {}",
            output
        ))),
    }
}
