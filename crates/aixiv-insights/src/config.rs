//! Configuration for the AIxiv Insights relay.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

/// Upstream API constants.
pub mod api {
    use std::time::Duration;

    /// arXiv Atom export endpoint.
    pub const ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

    /// Gemini REST base (the model path is appended per call).
    pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Model used when a theme request does not name one.
    pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

    /// Search relay timeout.
    pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

    /// Theme generation timeout. Model calls routinely take longer than a search.
    pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Sampling temperature for theme clustering.
    pub const THEME_TEMPERATURE: f64 = 0.2;

    /// Maximum accepted request body (matches the old Express JSON limit).
    pub const MAX_BODY_BYTES: usize = 1024 * 1024;

    /// Default listening port.
    pub const DEFAULT_PORT: u16 = 5000;
}

/// Search pagination defaults.
pub mod search {
    /// Offset used when the caller sends none.
    pub const DEFAULT_OFFSET: u32 = 0;

    /// Page size used when the caller sends none.
    pub const DEFAULT_LIMIT: u32 = 10;
}

/// Relay configuration. Built once at startup and shared read-only.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key. Theme extraction is refused without it.
    pub api_key: Option<String>,

    /// Model used when a request carries no `modelName`.
    pub default_model: String,

    /// arXiv query endpoint (overridable for mock servers).
    pub arxiv_api_url: String,

    /// Gemini REST base (overridable for mock servers).
    pub gemini_api_url: String,

    /// Timeout for the arXiv call.
    pub search_timeout: Duration,

    /// Timeout for the Gemini call.
    pub generation_timeout: Duration,

    /// Connection timeout for both upstreams.
    pub connect_timeout: Duration,

    /// Listening port.
    pub port: u16,

    /// Built frontend to serve for unmatched GET paths.
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Create a configuration with production upstreams.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            default_model: api::DEFAULT_MODEL.to_string(),
            arxiv_api_url: api::ARXIV_API_URL.to_string(),
            gemini_api_url: api::GEMINI_API_URL.to_string(),
            search_timeout: api::SEARCH_TIMEOUT,
            generation_timeout: api::GENERATION_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            port: api::DEFAULT_PORT,
            static_dir: None,
        }
    }

    /// Create a test configuration pointing both upstreams at a mock server.
    ///
    /// arXiv is served under `/api/query` and Gemini under `/v1beta`.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            default_model: "test-model".to_string(),
            arxiv_api_url: format!("{}/api/query", base_url),
            gemini_api_url: format!("{}/v1beta", base_url),
            search_timeout: Duration::from_secs(5),
            generation_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            port: 0,
            static_dir: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `API_KEY` (falling back to `GEMINI_API_KEY`), `GEMINI_MODEL`,
    /// `PROXY_PORT`, `ARXIV_API_URL`, `GEMINI_API_URL` and `STATIC_DIR`.
    ///
    /// # Errors
    ///
    /// Returns error if a port or URL variable is malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY")).ok();
        let mut config = Self::new(api_key);

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config = config.with_default_model(model);
        }
        if let Ok(port) = std::env::var("PROXY_PORT") {
            config.port = port.parse().with_context(|| format!("invalid PROXY_PORT: {port}"))?;
        }
        if let Ok(url) = std::env::var("ARXIV_API_URL") {
            config.arxiv_api_url = url;
        }
        if let Ok(url) = std::env::var("GEMINI_API_URL") {
            config.gemini_api_url = url;
        }
        config.static_dir = std::env::var_os("STATIC_DIR").map(PathBuf::from);

        config.validate()?;
        Ok(config)
    }

    /// Override the default model. Blank names are ignored.
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.default_model = model.trim().to_string();
        }
        self
    }

    /// Check the upstream URLs, timeouts and default model id.
    ///
    /// # Errors
    ///
    /// Returns error naming the offending URL.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, raw) in [("arXiv", &self.arxiv_api_url), ("Gemini", &self.gemini_api_url)] {
            let parsed = url::Url::parse(raw).with_context(|| format!("invalid {name} URL: {raw}"))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{name} URL must use http or https: {raw}");
            }
        }
        if !crate::models::is_valid_model_id(&self.default_model) {
            anyhow::bail!("invalid default model id: {}", self.default_model);
        }
        if self.search_timeout.is_zero() || self.generation_timeout.is_zero() {
            anyhow::bail!("upstream timeouts must be non-zero");
        }
        Ok(())
    }

    /// Check if a Gemini API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_api_key", &self.has_api_key())
            .field("default_model", &self.default_model)
            .field("arxiv_api_url", &self.arxiv_api_url)
            .field("gemini_api_url", &self.gemini_api_url)
            .field("search_timeout", &self.search_timeout)
            .field("generation_timeout", &self.generation_timeout)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}
