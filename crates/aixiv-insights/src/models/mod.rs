//! Data models for the search relay and theme extractor.
//!
//! Wire names follow the frontend: `camelCase` fields, with arXiv's own
//! parameter names accepted as aliases on [`SearchRequest`].

mod search;
mod themes;

pub use search::{DEFAULT_CONTENT_TYPE, RawPayload, SearchRequest, SortBy, SortOrder};
pub use themes::{
    PaperSummary, Theme, ThemeEntry, ThemeExtractionRequest, ThemeExtractionResponse,
    is_valid_model_id,
};
