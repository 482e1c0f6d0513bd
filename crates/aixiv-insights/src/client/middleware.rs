//! Middleware for the outbound HTTP clients.
//!
//! [`RequestLogging`] records one debug event per upstream call. Query
//! strings are left out of the log line.

use std::time::Instant;

use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};

/// Logs method, target, status and latency of every upstream call.
#[derive(Debug, Clone, Copy)]
pub struct RequestLogging {
    /// Upstream label used in the log line (e.g. "arxiv").
    upstream: &'static str,
}

impl RequestLogging {
    #[must_use]
    pub const fn new(upstream: &'static str) -> Self {
        Self { upstream }
    }
}

#[async_trait::async_trait]
impl Middleware for RequestLogging {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let host = req.url().host_str().unwrap_or_default().to_string();
        let path = req.url().path().to_string();
        let started = Instant::now();

        let result = next.run(req, extensions).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(response) => tracing::debug!(
                upstream = self.upstream,
                %method,
                %host,
                %path,
                status = response.status().as_u16(),
                elapsed_ms,
                "Upstream call completed"
            ),
            Err(e) => tracing::debug!(
                upstream = self.upstream,
                %method,
                %host,
                %path,
                elapsed_ms,
                error = %e,
                "Upstream call failed"
            ),
        }

        result
    }
}
