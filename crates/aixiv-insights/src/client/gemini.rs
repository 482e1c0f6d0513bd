//! Gemini `generateContent` client.
//!
//! Only the slice of the API the theme extractor needs: a single user turn,
//! a temperature, and JSON response mode.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::models::is_valid_model_id;

/// Parameters of a single text generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier, with or without the `models/` prefix.
    pub model: String,
    /// Full prompt text.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Ask the model to answer with raw JSON.
    pub json_output: bool,
}

/// A text-generation backend.
///
/// The theme extractor talks to this trait so it can be exercised without a
/// live model.
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Whether a credential is available. Unconfigured models are never called.
    fn is_configured(&self) -> bool;

    /// Run one generation and return the model's text.
    async fn generate(&self, request: &GenerationRequest) -> RelayResult<String>;
}

/// Google Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    /// HTTP client with middleware.
    client: reqwest_middleware::ClientWithMiddleware,

    /// API key (optional; calls are refused without it).
    api_key: Option<String>,

    /// REST base, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    api_url: String,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client =
            super::build_http_client("gemini", config.generation_timeout, config.connect_timeout)?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.api_url, model)
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiClient {
    fn is_configured(&self) -> bool {
        self.has_api_key()
    }

    async fn generate(&self, request: &GenerationRequest) -> RelayResult<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(RelayError::ServiceNotConfigured);
        };
        if !is_valid_model_id(&request.model) {
            let message = format!("not a model id: {:?}", request.model);
            return Err(RelayError::invalid("modelName", message));
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request.json_output.then(|| "application/json".to_string()),
            },
        };
        let body = serde_json::to_vec(&body).map_err(|e| RelayError::generative(e.to_string()))?;

        tracing::debug!(
            model = %request.model,
            prompt_len = request.prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| match e {
                reqwest_middleware::Error::Reqwest(e) => RelayError::generative_transport(&e),
                reqwest_middleware::Error::Middleware(e) => RelayError::generative(e.to_string()),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RelayError::generative_transport(&e))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|env| env.error.message)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(RelayError::generative(format!("{} {}", status.as_u16(), detail)));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| RelayError::generative(format!("malformed generateContent response: {e}")))?;

        parsed.into_text()
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("has_api_key", &self.has_api_key())
            .field("api_url", &self.api_url)
            .finish()
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> RelayResult<String> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked: {r}"))
                .unwrap_or_else(|| "response contained no candidates".to_string());
            return Err(RelayError::generative(reason));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
                return Err(RelayError::generative(format!("no text returned (finish reason {reason})")));
            }
        }

        Ok(text)
    }
}
