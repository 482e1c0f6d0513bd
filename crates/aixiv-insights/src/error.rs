//! Error types for the AIxiv Insights relay.
//!
//! Every failure a handler can produce is one variant of [`RelayError`], so
//! callers branch on the variant rather than on message text.

use std::fmt;

/// Category of a failed arXiv fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    /// DNS, TCP or TLS failure before a response arrived.
    Connect,
    /// The request exceeded its timeout.
    Timeout,
    /// Upstream answered with a non-success status.
    Status(u16),
    /// The response body could not be read.
    Body,
    /// Any other transport failure.
    Request,
}

impl FetchFailureKind {
    /// Classify a reqwest error.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_body() || err.is_decode() {
            Self::Body
        } else {
            Self::Request
        }
    }
}

impl fmt::Display for FetchFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect => f.write_str("ConnectError"),
            Self::Timeout => f.write_str("TimeoutError"),
            Self::Status(code) => write!(f, "HTTPStatusError({code})"),
            Self::Body => f.write_str("BodyError"),
            Self::Request => f.write_str("RequestError"),
        }
    }
}

/// Errors surfaced by the search relay and theme extractor.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// The arXiv call failed (network, timeout or non-2xx).
    #[error("Failed to fetch from arXiv API: {kind}: {message}")]
    UpstreamFetch {
        /// Failure category
        kind: FetchFailureKind,
        /// Underlying cause
        message: String,
    },

    /// Anything else that went wrong while relaying a search.
    #[error("Unexpected error: {0}")]
    UnexpectedRelay(String),

    /// No Gemini credential is configured.
    #[error("Server is not configured with API_KEY")]
    ServiceNotConfigured,

    /// The model answered with text that is not JSON.
    #[error("Failed to parse Gemini API response: {0}")]
    ResponseParse(#[source] serde_json::Error),

    /// The Gemini call failed (network, quota, model-side error).
    #[error("Gemini API error: {message}")]
    GenerativeService {
        /// Underlying cause
        message: String,
    },

    /// Caller input was rejected before any upstream call.
    #[error("Invalid input for '{field}': {message}")]
    InvalidRequest {
        /// Offending field
        field: String,
        /// What was wrong with it
        message: String,
    },
}

/// Machine-readable tag for each [`RelayError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UpstreamFetchFailure,
    UnexpectedRelayFailure,
    ServiceNotConfigured,
    ResponseParseFailure,
    GenerativeServiceFailure,
    InvalidRequest,
}

impl ErrorKind {
    /// Snake-case tag used in the JSON error envelope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UpstreamFetchFailure => "upstream_fetch_failure",
            Self::UnexpectedRelayFailure => "unexpected_relay_failure",
            Self::ServiceNotConfigured => "service_not_configured",
            Self::ResponseParseFailure => "response_parse_failure",
            Self::GenerativeServiceFailure => "generative_service_failure",
            Self::InvalidRequest => "invalid_request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RelayError {
    /// Create an upstream fetch error from a reqwest failure.
    #[must_use]
    pub fn upstream_fetch(err: &reqwest::Error) -> Self {
        Self::UpstreamFetch {
            kind: FetchFailureKind::from_reqwest(err),
            message: err.to_string(),
        }
    }

    /// Create an upstream fetch error for a non-success status.
    #[must_use]
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        Self::UpstreamFetch {
            kind: FetchFailureKind::Status(status),
            message: message.into(),
        }
    }

    /// Create an unexpected relay error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedRelay(message.into())
    }

    /// Create a generative service error.
    #[must_use]
    pub fn generative(message: impl Into<String>) -> Self {
        Self::GenerativeService { message: message.into() }
    }

    /// Create a generative service error from a transport failure, keeping its category.
    #[must_use]
    pub fn generative_transport(err: &reqwest::Error) -> Self {
        Self::generative(format!("{}: {err}", FetchFailureKind::from_reqwest(err)))
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The variant's tag.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UpstreamFetch { .. } => ErrorKind::UpstreamFetchFailure,
            Self::UnexpectedRelay(_) => ErrorKind::UnexpectedRelayFailure,
            Self::ServiceNotConfigured => ErrorKind::ServiceNotConfigured,
            Self::ResponseParse(_) => ErrorKind::ResponseParseFailure,
            Self::GenerativeService { .. } => ErrorKind::GenerativeServiceFailure,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
        }
    }

    /// Whether the caller is at fault (as opposed to the server or an upstream).
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    /// Short hint for the UI on what the user can do about this failure.
    #[must_use]
    pub const fn guidance(&self) -> &'static str {
        match self {
            Self::ServiceNotConfigured => "Check the server configuration.",
            Self::InvalidRequest { .. } => "Fix the request and resend it.",
            _ => "Please try again.",
        }
    }
}

/// Result type alias for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
