//! Web layer module
//!
//! The HTTP interface of the loader. Handlers are thin: validation and
//! retrieval live in [`crate::sources`], indexing in [`crate::ingestor`].
//!
//! # Routes
//!
//! - `GET /?link=<url>`: raw playlist text; without `link`, the loader page
//! - `GET /api/v1/playlist?link=<url>`: indexed entries as JSON
//! - `GET /player`: player page, parameterised by display options
//! - `GET /health`, `GET /live`: health checks

use anyhow::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{config::Config, sources::PlaylistFetcher};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod responses;

pub use pages::PlayerOptions;
pub use responses::{fetch_error_response, text_response};

/// Shared state for all handlers; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub fetcher: Arc<PlaylistFetcher>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = PlaylistFetcher::new(&config.fetcher)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
        })
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/live", get(handlers::health::liveness_check))
        .nest("/api/v1", api_v1_routes())
        .route("/player", get(handlers::player::player_page))
        .route("/", get(handlers::playlist::index))
        // Middleware (applied in reverse order)
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new().route("/playlist", get(handlers::playlist::playlist_entries))
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: Config) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.web.host, config.web.port).parse()?;
        let app = create_app(AppState::new(config)?);
        Ok(Self { app, addr })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Serve until Ctrl+C
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
