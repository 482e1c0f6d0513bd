//! Fuzzing library for aixiv-insights.
//!
//! Targets cover model-output normalization and the two inbound request
//! shapes (theme request bodies and search query strings).
//!
//! # Usage
//!
//! ```bash
//! cd crates/sentinel-fuzz
//! cargo +nightly fuzz run fuzz_model_output -- -max_total_time=60
//! ```

pub use aixiv_insights::{models, relay::normalize_model_output};
