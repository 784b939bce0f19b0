//! Interview HTTP gateway.
//!
//! Exposes the session gateway over JSON:
//! - `POST /interview/start`
//! - `POST /interview/turn`
//! - `GET /interview/{session_id}`
//! - `DELETE /interview/{session_id}`
//! - `GET /health`

mod handlers;
pub mod types;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::models::ServerConfig;
use crate::services::SessionGateway;

pub use types::{ErrorResponse, StartResponse, TurnRequest, TurnResponseBody};

/// Interview HTTP server.
pub struct InterviewHttpServer {
    config: ServerConfig,
    gateway: Arc<SessionGateway>,
}

impl InterviewHttpServer {
    pub fn new(gateway: Arc<SessionGateway>, config: ServerConfig) -> Self {
        Self { config, gateway }
    }

    /// Build the router.
    pub fn build_router(&self) -> Router {
        router(Arc::clone(&self.gateway), self.config.enable_cors)
    }

    /// Start the server.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid listen address")?;
        let router = self.build_router();

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!(%addr, "interview HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server error")?;
        Ok(())
    }
}

/// Router over `gateway`, with permissive CORS when `enable_cors` is set.
pub fn router(gateway: Arc<SessionGateway>, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/interview/start", post(handlers::start_interview))
        .route("/interview/turn", post(handlers::submit_turn))
        .route(
            "/interview/{session_id}",
            get(handlers::get_session).delete(handlers::expire_session),
        )
        .route("/health", get(handlers::health_check))
        .with_state(gateway);

    if enable_cors {
        app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
            .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}
