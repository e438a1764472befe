use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, SnapmorphError};
use crate::models::{normalize_output, TransformRequest, TransformResponse};

const API_BASE: &str = "https://api.replicate.com/v1";

/// Client for the hosted transformation model. Holds the credential
/// resolved once at startup; read-only afterwards.
#[derive(Clone)]
pub struct ReplicateClient {
    http: reqwest::Client,
    api_token: String,
    model: String,
    api_base: String,
}

impl ReplicateClient {
    pub fn new(api_token: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            model: model.into(),
            api_base: API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn predictions_url(&self) -> String {
        format!("{}/models/{}/predictions", self.api_base, self.model)
    }

    /// Issues the single blocking model call: prompt text plus a
    /// one-element list holding the data-URL-encoded image. No retries,
    /// no timeout beyond what the HTTP client provides.
    pub async fn transform(&self, request: &TransformRequest) -> Result<TransformResponse> {
        request.validate()?;

        let payload = build_payload(request);

        log::info!("🎨 Dispatching transformation to {}", self.model);
        log::debug!(
            "Prompt: {:?} | image: {} ({}x{}, {:.1}KB)",
            request.prompt,
            request.image.kind(),
            request.image.width(),
            request.image.height(),
            request.image.size_kb(),
        );

        let response = self
            .http
            .post(self.predictions_url())
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_api_error(status.as_u16(), &text));
        }

        let prediction: Prediction = response.json().await?;

        if let Some(message) = prediction.error_message() {
            return Err(SnapmorphError::Model(message));
        }

        let output = prediction.output.ok_or_else(|| {
            SnapmorphError::UnexpectedResponse("prediction finished without output".into())
        })?;
        let result_url = normalize_output(&output)?;

        log::info!("✅ Transformation complete: {}", result_url);

        Ok(TransformResponse {
            result_url,
            model: self.model.clone(),
        })
    }
}

/// Request body for the predictions endpoint.
fn build_payload(request: &TransformRequest) -> Value {
    json!({
        "input": {
            "prompt": request.prompt,
            "image_input": [request.image.to_data_url()]
        }
    })
}

fn map_api_error(status: u16, text: &str) -> SnapmorphError {
    let message = extract_detail(text).unwrap_or_else(|| text.trim().to_string());
    match status {
        401 | 403 => SnapmorphError::Auth(if message.is_empty() {
            "Invalid API token".into()
        } else {
            message
        }),
        402 => SnapmorphError::Api {
            status,
            message: "Billing issue: set up billing at https://replicate.com/account/billing"
                .into(),
        },
        429 => SnapmorphError::RateLimited,
        _ => SnapmorphError::Api { status, message },
    }
}

/// The API wraps error text as `{"detail": "..."}` on most failures.
fn extract_detail(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl Prediction {
    /// Prediction-level failures arrive with HTTP 200 and an `error`
    /// field (or a failed/canceled status).
    fn error_message(&self) -> Option<String> {
        match &self.error {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Null) | None => match self.status.as_deref() {
                Some("failed") => Some("prediction failed without detail".into()),
                Some("canceled") => Some("prediction was canceled".into()),
                _ => None,
            },
            Some(other) => Some(other.to_string()),
        }
    }
}
