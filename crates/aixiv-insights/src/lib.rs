//! AIxiv Insights relay
//!
//! Backend for the AIxiv Insights frontend. Two thin endpoints:
//!
//! - **Search relay**: forwards a literature search to the arXiv export API
//!   and returns the Atom feed untouched.
//! - **Theme extractor**: asks Gemini to cluster paper summaries into named
//!   research themes, then validates and normalizes the model's JSON.
//!
//! # Example
//!
//! ```no_run
//! use aixiv_insights::{config::Config, models::SearchRequest, relay::RelayContext};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let ctx = RelayContext::from_config(&config)?;
//!
//!     let feed = ctx.search.relay_search(&SearchRequest::new("all:\"diffusion\"")).await?;
//!     println!("{} bytes of Atom", feed.body.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod relay;
pub mod server;

pub use config::Config;
pub use error::{ErrorKind, RelayError, RelayResult};
pub use relay::{RelayContext, SearchRelay, ThemeExtractor};
