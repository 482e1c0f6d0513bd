//! Search relay: forwards a [`SearchRequest`] to arXiv verbatim.

use crate::client::ArxivClient;
use crate::error::{RelayError, RelayResult};
use crate::models::{RawPayload, SearchRequest};

/// Pass-through proxy for arXiv queries.
#[derive(Debug, Clone)]
pub struct SearchRelay {
    client: ArxivClient,
}

impl SearchRelay {
    #[must_use]
    pub const fn new(client: ArxivClient) -> Self {
        Self { client }
    }

    /// Validate `request`, forward it once, and return arXiv's payload as-is.
    pub async fn relay_search(&self, request: &SearchRequest) -> RelayResult<RawPayload> {
        request.validate()?;

        tracing::info!(
            query = %request.query,
            offset = request.offset,
            limit = request.limit,
            sort_by = request.sort_field.map(|s| s.as_str()),
            "Relaying arXiv search"
        );

        match self.client.query(request).await {
            Ok(payload) => Ok(payload),
            Err(err @ (RelayError::UpstreamFetch { .. } | RelayError::UnexpectedRelay(_))) => {
                tracing::error!(kind = %err.kind(), error = %err, "Error proxying arXiv request");
                Err(err)
            }
            Err(other) => {
                tracing::error!(error = %other, "Unexpected error relaying arXiv request");
                Err(RelayError::unexpected(other.to_string()))
            }
        }
    }
}
