//! HTTP routes.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /search`, `GET /api/arxiv/query` | search relay |
//! | `POST /themes`, `POST /api/gemini/themes` | theme extractor |
//! | `GET /health` | liveness |
//!
//! Failures are rendered as `{"error": kind, "detail": message, "guidance": hint}`.

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::api;
use crate::error::RelayError;
use crate::models::{RawPayload, SearchRequest, ThemeExtractionRequest, ThemeExtractionResponse};
use crate::relay::RelayContext;

/// JSON body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    /// Machine-readable failure kind.
    pub error: &'static str,
    /// Human-readable message.
    pub detail: String,
    /// What the user can do about it.
    pub guidance: &'static str,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let envelope = ErrorEnvelope {
            error: self.kind().as_str(),
            detail: self.to_string(),
            guidance: self.guidance(),
        };

        (status, Json(envelope)).into_response()
    }
}

/// Create the HTTP router.
///
/// With `static_dir`, unmatched paths are served from that directory and fall
/// back to its `index.html`.
pub fn create_router(ctx: RelayContext, static_dir: Option<&Path>) -> Router {
    let state = Arc::new(ctx);

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/search", get(handle_search))
        .route("/api/arxiv/query", get(handle_search))
        .route("/themes", post(handle_themes))
        .route("/api/gemini/themes", post(handle_themes))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        ),
        None => router,
    };

    router
        .layer(DefaultBodyLimit::max(api::MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn handle_search(
    State(ctx): State<Arc<RelayContext>>,
    query: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Response, RelayError> {
    let Query(request) = query.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected search query string");
        RelayError::invalid("query string", rejection.body_text())
    })?;

    let payload = ctx.search.relay_search(&request).await?;
    Ok(raw_payload_response(payload))
}

async fn handle_themes(
    State(ctx): State<Arc<RelayContext>>,
    body: Result<Json<ThemeExtractionRequest>, JsonRejection>,
) -> Result<Json<ThemeExtractionResponse>, RelayError> {
    let Json(request) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected theme request body");
        RelayError::invalid("body", rejection.body_text())
    })?;

    let response = ctx.themes.extract_themes(&request).await?;
    Ok(Json(response))
}

/// Send an upstream payload back with its own status and content type.
fn raw_payload_response(payload: RawPayload) -> Response {
    let status = StatusCode::from_u16(payload.status).unwrap_or(StatusCode::OK);
    let content_type = payload.content_type_or_default().to_string();

    (status, [(header::CONTENT_TYPE, content_type)], payload.body).into_response()
}
