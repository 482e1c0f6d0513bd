//! The two relay operations.
//!
//! - [`SearchRelay`]: arXiv pass-through
//! - [`ThemeExtractor`]: Gemini theme clustering with output normalization
//!
//! The handlers share nothing but the immutable configuration they were
//! built from.

mod prompt;
mod search;
mod themes;

pub use prompt::build_theme_prompt;
pub use search::SearchRelay;
pub use themes::{ThemeExtractor, normalize_model_output, strip_code_fence};

use std::sync::Arc;

use crate::client::{ArxivClient, GeminiClient, GenerativeModel};
use crate::config::Config;

/// Everything a request handler needs.
#[derive(Debug, Clone)]
pub struct RelayContext {
    /// Search relay.
    pub search: SearchRelay,

    /// Theme extractor.
    pub themes: ThemeExtractor,
}

impl RelayContext {
    /// Create a new context from its two handlers.
    #[must_use]
    pub const fn new(search: SearchRelay, themes: ThemeExtractor) -> Self {
        Self { search, themes }
    }

    /// Build both upstream clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns error if an HTTP client cannot be initialized.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let arxiv = ArxivClient::new(config)?;
        let gemini: Arc<dyn GenerativeModel> = Arc::new(GeminiClient::new(config)?);

        Ok(Self::new(
            SearchRelay::new(arxiv),
            ThemeExtractor::new(gemini, config.default_model.clone()),
        ))
    }
}
