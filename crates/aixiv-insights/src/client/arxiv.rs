//! arXiv export API client.

use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::models::{RawPayload, SearchRequest};

/// Forwards search queries to arXiv and returns the Atom feed untouched.
#[derive(Clone)]
pub struct ArxivClient {
    /// HTTP client with middleware.
    client: reqwest_middleware::ClientWithMiddleware,

    /// Query endpoint.
    api_url: String,
}

impl ArxivClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client =
            super::build_http_client("arxiv", config.search_timeout, config.connect_timeout)?;

        Ok(Self {
            client,
            api_url: config.arxiv_api_url.clone(),
        })
    }

    /// Query endpoint this client talks to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue a single GET for `request` and return the raw response.
    ///
    /// # Errors
    ///
    /// `UpstreamFetch` on transport failure, timeout or non-2xx status;
    /// `UnexpectedRelay` for middleware failures.
    pub async fn query(&self, request: &SearchRequest) -> RelayResult<RawPayload> {
        let params = request.upstream_params();

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| match e {
                reqwest_middleware::Error::Reqwest(err) => RelayError::upstream_fetch(&err),
                reqwest_middleware::Error::Middleware(err) => RelayError::unexpected(err.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown");
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                format!("{} {}", status.as_u16(), reason)
            } else {
                format!("{} {}: {}", status.as_u16(), reason, text.trim())
            };
            return Err(RelayError::upstream_status(status.as_u16(), message));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| RelayError::upstream_fetch(&e))?;

        Ok(RawPayload {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}

impl std::fmt::Debug for ArxivClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArxivClient").field("api_url", &self.api_url).finish()
    }
}
