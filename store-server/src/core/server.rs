//! Server Implementation
//!
//! Router assembly, HTTP listener and graceful shutdown

use std::time::Duration;

use axum::{Router, middleware};
use http::{HeaderName, StatusCode};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::{Config, Result, ServerError, ServerState};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Build the application router with all API routes and layers
///
/// The last layer added runs first: request ids are assigned before the
/// logging middleware sees the request.
pub fn build_router(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::new()
        .merge(crate::api::health::router())
        .merge(crate::api::items::router())
        .merge(crate::api::orders::router())
        .merge(crate::api::users::router())
        .merge(crate::api::dashboard::router())
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(super::middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl-C, then close the database pool
    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = build_router(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        tracing::info!("Store server listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        state.close().await;
        served?;

        Ok(())
    }
}
