//! Upstream API clients.
//!
//! Provides async HTTP clients with:
//! - Connection pooling via reqwest
//! - Per-upstream request timeouts
//! - Debug logging of every outbound call
//!
//! Neither client retries or caches: each relay call maps to exactly one
//! upstream request.

mod arxiv;
mod gemini;
mod middleware;

use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

pub use arxiv::ArxivClient;
pub use gemini::{GeminiClient, GenerationRequest, GenerativeModel};
pub use middleware::RequestLogging;

use crate::config::api;

/// Build a pooled client with the given timeouts and request logging.
fn build_http_client(
    upstream: &'static str,
    timeout: Duration,
    connect_timeout: Duration,
) -> anyhow::Result<ClientWithMiddleware> {
    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .connect_timeout(connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    Ok(ClientBuilder::new(client).with(RequestLogging::new(upstream)).build())
}
