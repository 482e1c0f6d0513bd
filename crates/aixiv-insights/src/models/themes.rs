//! Theme extraction request and response models.

use serde::{Deserialize, Serialize};

use crate::error::{RelayError, RelayResult};

/// Whether `model` is a bare Gemini model id, optionally prefixed with `models/`.
///
/// Ids become a URL path segment, so only `[A-Za-z0-9._-]` is accepted.
#[must_use]
pub fn is_valid_model_id(model: &str) -> bool {
    let id = model.strip_prefix("models/").unwrap_or(model);
    !id.is_empty()
        && !id.starts_with('.')
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

/// The slice of a paper the model sees when clustering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    /// Stable identifier (usually the arXiv abs URL).
    pub id: String,
    /// Paper title.
    pub title: String,
    /// Abstract or excerpt.
    pub summary: String,
}

impl PaperSummary {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            summary: summary.into(),
        }
    }
}

/// Body of a theme extraction request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExtractionRequest {
    /// Papers to cluster. Order does not matter.
    #[serde(default)]
    pub papers: Vec<PaperSummary>,

    /// Model override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

impl ThemeExtractionRequest {
    #[must_use]
    pub fn new(papers: Vec<PaperSummary>) -> Self {
        Self {
            papers,
            model_name: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    /// The requested model, treating a blank name as absent.
    #[must_use]
    pub fn requested_model(&self) -> Option<&str> {
        self.model_name.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// Reject a model override that is not a plain model id.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` naming `modelName`.
    pub fn validate(&self) -> RelayResult<()> {
        match self.requested_model() {
            Some(model) if !is_valid_model_id(model) => {
                Err(RelayError::invalid("modelName", format!("not a model id: {model:?}")))
            }
            _ => Ok(()),
        }
    }
}

/// A named cluster of papers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    /// Short descriptive name.
    pub name: String,
    /// Papers the model assigned to this theme.
    pub count: u64,
}

/// One element of the model's `themes` array.
///
/// Entries that match [`Theme`] are typed; anything else is kept verbatim so
/// that no model output is silently dropped or rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeEntry {
    Theme(Theme),
    Unrecognized(serde_json::Value),
}

impl ThemeEntry {
    /// The typed theme, if this entry is well-formed.
    #[must_use]
    pub const fn as_theme(&self) -> Option<&Theme> {
        match self {
            Self::Theme(theme) => Some(theme),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<Theme> for ThemeEntry {
    fn from(theme: Theme) -> Self {
        Self::Theme(theme)
    }
}

/// Result of a theme extraction: `{"themes": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeExtractionResponse {
    pub themes: Vec<ThemeEntry>,
}

impl ThemeExtractionResponse {
    /// An empty theme list.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Well-formed themes only.
    pub fn valid_themes(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter().filter_map(ThemeEntry::as_theme)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
