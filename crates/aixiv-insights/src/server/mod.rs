//! HTTP server for the relay.

pub mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::relay::RelayContext;

/// The relay's HTTP front end.
pub struct AppServer {
    /// Request handlers.
    ctx: RelayContext,

    /// Built frontend to serve, if any.
    static_dir: Option<PathBuf>,
}

impl AppServer {
    /// Create a new server.
    #[must_use]
    pub fn new(ctx: RelayContext) -> Self {
        Self {
            ctx,
            static_dir: None,
        }
    }

    /// Also serve a built frontend from `dir`.
    #[must_use]
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Build the router without binding a socket.
    pub fn router(self) -> axum::Router {
        routes::create_router(self.ctx, self.static_dir.as_deref())
    }

    /// Bind `0.0.0.0:port` and serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let has_static = self.static_dir.is_some();
        let router = self.router();
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local = listener.local_addr()?;

        tracing::info!(addr = %local, "HTTP server listening on http://{}", local);
        tracing::info!("  Health check: http://{}/health", local);
        tracing::info!("  arXiv proxy:  http://{}/search (alias /api/arxiv/query)", local);
        tracing::info!("  Gemini API:   http://{}/themes (alias /api/gemini/themes)", local);
        if has_static {
            tracing::info!("  Frontend:     http://{}/", local);
        }

        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for AppServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppServer")
            .field("ctx", &self.ctx)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received shutdown signal");
}
