//! Search relay request and payload models.

use axum::body::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::search::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use crate::error::{RelayError, RelayResult};

/// Content type assumed when arXiv omits one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/atom+xml";

/// arXiv sort criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevance,
    LastUpdatedDate,
    SubmittedDate,
}

impl SortBy {
    /// Value sent as `sortBy`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::LastUpdatedDate => "lastUpdatedDate",
            Self::SubmittedDate => "submittedDate",
        }
    }
}

/// arXiv sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Value sent as `sortOrder`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// A literature search to forward to arXiv.
///
/// Field aliases accept arXiv's own parameter names so the frontend can call
/// `/api/arxiv/query` exactly as it would call arXiv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// arXiv search expression (e.g. `all:"diffusion"`).
    #[serde(alias = "search_query")]
    pub query: String,

    /// Sort criterion; omitted upstream when absent.
    #[serde(default, alias = "sortBy", deserialize_with = "empty_as_none")]
    pub sort_field: Option<SortBy>,

    /// Sort direction; omitted upstream when absent.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort_order: Option<SortOrder>,

    /// Index of the first result.
    #[serde(default = "default_offset", alias = "start")]
    pub offset: u32,

    /// Number of results to return.
    #[serde(default = "default_limit", alias = "max_results")]
    pub limit: u32,
}

fn default_offset() -> u32 {
    DEFAULT_OFFSET
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Treat `sortBy=` the same as a missing parameter.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => T::deserialize(serde::de::value::StrDeserializer::<serde::de::value::Error>::new(value))
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl SearchRequest {
    /// A request for `query` with default paging and no sorting.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            sort_field: None,
            sort_order: None,
            offset: DEFAULT_OFFSET,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the sort criterion and direction.
    #[must_use]
    pub fn sorted(mut self, field: SortBy, order: SortOrder) -> Self {
        self.sort_field = Some(field);
        self.sort_order = Some(order);
        self
    }

    /// Set the page window.
    #[must_use]
    pub fn page(mut self, offset: u32, limit: u32) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// Reject requests arXiv cannot answer meaningfully.
    pub fn validate(&self) -> RelayResult<()> {
        if self.query.trim().is_empty() {
            return Err(RelayError::invalid("query", "cannot be empty"));
        }
        if self.limit == 0 {
            return Err(RelayError::invalid("limit", "must be at least 1"));
        }
        Ok(())
    }

    /// Upstream query parameters, one per present field.
    #[must_use]
    pub fn upstream_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("search_query", self.query.clone()),
            ("start", self.offset.to_string()),
            ("max_results", self.limit.to_string()),
        ];

        if let Some(sort_by) = self.sort_field {
            params.push(("sortBy", sort_by.as_str().to_string()));
        }
        if let Some(order) = self.sort_order {
            params.push(("sortOrder", order.as_str().to_string()));
        }

        params
    }
}

/// An upstream response relayed without interpretation.
#[derive(Debug, Clone)]
pub struct RawPayload {
    /// Upstream status code.
    pub status: u16,
    /// Upstream `Content-Type`, if sent.
    pub content_type: Option<String>,
    /// Body bytes exactly as received.
    pub body: Bytes,
}

impl RawPayload {
    /// Content type to send downstream.
    #[must_use]
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}
