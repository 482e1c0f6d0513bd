//! Theme extractor: asks a generative model to cluster papers into themes.
//!
//! The model's answer is untrusted text. [`normalize_model_output`] turns it
//! into a well-formed [`ThemeExtractionResponse`] or a `ResponseParse` error:
//!
//! 1. trim whitespace
//! 2. strip a surrounding ```` ``` ```` fence (only if more than two lines)
//! 3. parse strictly as JSON
//! 4. a missing or non-array `themes` becomes `[]`

use std::sync::Arc;

use crate::client::{GenerationRequest, GenerativeModel};
use crate::config::api;
use crate::error::{RelayError, RelayResult};
use crate::models::{ThemeEntry, ThemeExtractionRequest, ThemeExtractionResponse};

use super::prompt::build_theme_prompt;

const FENCE: &str = "```";

/// Clusters paper summaries into named research themes.
#[derive(Clone)]
pub struct ThemeExtractor {
    model: Arc<dyn GenerativeModel>,
    default_model: String,
}

impl ThemeExtractor {
    #[must_use]
    pub fn new(model: Arc<dyn GenerativeModel>, default_model: impl Into<String>) -> Self {
        Self {
            model,
            default_model: default_model.into(),
        }
    }

    /// Model used when the request names none.
    #[must_use]
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Run one clustering call for `request`.
    ///
    /// An unconfigured model fails before anything else; an empty paper list
    /// returns `{themes: []}` without calling the model. A `modelName` that is
    /// not a plain model id is rejected before the call.
    pub async fn extract_themes(
        &self,
        request: &ThemeExtractionRequest,
    ) -> RelayResult<ThemeExtractionResponse> {
        if !self.model.is_configured() {
            tracing::error!(kind = %RelayError::ServiceNotConfigured.kind(), "Theme request refused");
            return Err(RelayError::ServiceNotConfigured);
        }

        if request.papers.is_empty() {
            tracing::debug!("No papers supplied, skipping model call");
            return Ok(ThemeExtractionResponse::empty());
        }

        request.validate().map_err(|err| {
            tracing::warn!(kind = %err.kind(), error = %err, "Rejected model override");
            err
        })?;

        let model = request.requested_model().unwrap_or(&self.default_model).to_string();
        let generation = GenerationRequest {
            model,
            prompt: build_theme_prompt(&request.papers),
            temperature: api::THEME_TEMPERATURE,
            json_output: true,
        };

        tracing::info!(model = %generation.model, papers = request.papers.len(), "Extracting themes");

        let text = self.model.generate(&generation).await.map_err(|err| {
            tracing::error!(kind = %err.kind(), model = %generation.model, error = %err, "Gemini API error");
            err
        })?;

        let response = normalize_model_output(&text).map_err(|err| {
            tracing::error!(kind = %err.kind(), error = %err, "Error parsing Gemini response");
            err
        })?;

        tracing::info!(themes = response.themes.len(), "Themes extracted");
        Ok(response)
    }
}

impl std::fmt::Debug for ThemeExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeExtractor")
            .field("configured", &self.model.is_configured())
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Remove a surrounding markdown code fence, keeping single-line fences intact.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with(FENCE) {
        return text;
    }

    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() <= 2 {
        return text;
    }

    // Byte range from the start of the second line to the end of the
    // second-to-last line.
    let start = lines[0].len() + 1;
    let end = text.len() - lines[lines.len() - 1].len() - 1;
    &text[start..end]
}

/// Turn raw model text into a theme list.
///
/// # Errors
///
/// `ResponseParse` if the (de-fenced) text is not valid JSON.
pub fn normalize_model_output(raw: &str) -> RelayResult<ThemeExtractionResponse> {
    let text = strip_code_fence(raw.trim());
    let parsed: serde_json::Value = serde_json::from_str(text).map_err(RelayError::ResponseParse)?;

    let themes = match parsed {
        serde_json::Value::Object(mut map) => match map.remove("themes") {
            Some(serde_json::Value::Array(items)) => items.into_iter().map(to_entry).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(ThemeExtractionResponse { themes })
}

fn to_entry(item: serde_json::Value) -> ThemeEntry {
    serde_json::from_value::<crate::models::Theme>(item.clone())
        .map_or(ThemeEntry::Unrecognized(item), ThemeEntry::Theme)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{PaperSummary, Theme};

    /// Canned model that records how often it was called.
    struct StubModel {
        configured: bool,
        reply: String,
        calls: AtomicUsize,
        last_model: std::sync::Mutex<Option<String>>,
    }

    impl StubModel {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
                last_model: std::sync::Mutex::new(None),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                configured: false,
                reply: String::new(),
                calls: AtomicUsize::new(0),
                last_model: std::sync::Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl GenerativeModel for StubModel {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate(&self, request: &GenerationRequest) -> RelayResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_model.lock().unwrap() = Some(request.model.clone());
            assert!(request.json_output);
            assert!((request.temperature - 0.2).abs() < f64::EPSILON);
            Ok(self.reply.clone())
        }
    }

    fn papers() -> Vec<PaperSummary> {
        vec![
            PaperSummary::new("1", "Diffusion for Video", "A video diffusion model."),
            PaperSummary::new("2", "LLM Agents", "Tool-using language agents."),
        ]
    }

    #[test]
    fn test_strip_fence_multiline() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\nline1\nline2\n```"), "line1\nline2");
    }

    #[test]
    fn test_strip_fence_keeps_short_blocks() {
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "```{\"a\":1}```");
        assert_eq!(strip_code_fence("```json\n{}"), "```json\n{}");
    }

    #[test]
    fn test_strip_fence_ignores_unfenced() {
        assert_eq!(strip_code_fence("{\"themes\":[]}"), "{\"themes\":[]}");
    }

    #[test]
    fn test_normalize_fenced() {
        let resp =
            normalize_model_output("```json\n{\"themes\":[{\"name\":\"NLP\",\"count\":3}]}\n```")
                .unwrap();
        let expected = Theme {
            name: "NLP".into(),
            count: 3,
        };
        assert_eq!(resp.themes, vec![ThemeEntry::Theme(expected)]);
    }

    #[test]
    fn test_normalize_surrounding_whitespace() {
        let resp = normalize_model_output("\n  {\"themes\":[]}  \n").unwrap();
        assert!(resp.is_empty());
    }

    #[test]
    fn test_normalize_invalid_json() {
        let err = normalize_model_output("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseParseFailure);

        let err = normalize_model_output("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResponseParseFailure);
    }

    #[test]
    fn test_normalize_missing_or_wrong_typed_themes() {
        assert!(normalize_model_output(r#"{"other":1}"#).unwrap().is_empty());
        assert!(normalize_model_output(r#"{"themes":"notalist"}"#).unwrap().is_empty());
        assert!(normalize_model_output(r#"{"themes":null}"#).unwrap().is_empty());
        assert!(normalize_model_output(r#"[{"name":"x","count":1}]"#).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_passes_malformed_entries_through() {
        let resp = normalize_model_output(r#"{"themes":[{"name":"A","count":2},{"label":"B"}]}"#)
            .unwrap();
        assert_eq!(resp.themes.len(), 2);
        assert_eq!(resp.valid_themes().count(), 1);
        assert_eq!(resp.themes[1], ThemeEntry::Unrecognized(json!({"label": "B"})));
    }

    #[tokio::test]
    async fn test_unconfigured_model_never_called() {
        let model = StubModel::unconfigured();
        let extractor = ThemeExtractor::new(model.clone(), "default");

        let err = extractor.extract_themes(&ThemeExtractionRequest::new(papers())).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceNotConfigured);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_papers_skips_model() {
        let model = StubModel::new(r#"{"themes":[{"name":"X","count":1}]}"#);
        let extractor = ThemeExtractor::new(model.clone(), "default");

        let resp = extractor.extract_themes(&ThemeExtractionRequest::default()).await.unwrap();
        assert!(resp.is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_model_override_and_default() {
        let model = StubModel::new(r#"{"themes":[]}"#);
        let extractor = ThemeExtractor::new(model.clone(), "default-model");

        tokio_test::block_on(extractor.extract_themes(&ThemeExtractionRequest::new(papers())))
            .unwrap();
        assert_eq!(model.last_model.lock().unwrap().as_deref(), Some("default-model"));

        let request = ThemeExtractionRequest::new(papers()).with_model("gemini-2.5-pro");
        tokio_test::block_on(extractor.extract_themes(&request)).unwrap();
        assert_eq!(model.last_model.lock().unwrap().as_deref(), Some("gemini-2.5-pro"));

        let request = ThemeExtractionRequest::new(papers()).with_model("   ");
        tokio_test::block_on(extractor.extract_themes(&request)).unwrap();
        assert_eq!(model.last_model.lock().unwrap().as_deref(), Some("default-model"));

        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    }
}
