//! `MosaicServer` — Axum HTTP server.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::routes;
use crate::shutdown::ShutdownCoordinator;
use crate::state::AppState;

/// The Mosaic API server.
pub struct MosaicServer {
    config: ServerConfig,
    state: AppState,
    shutdown: Arc<ShutdownCoordinator>,
}

impl MosaicServer {
    /// Create a new server over shared state.
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Build the Axum router with all routes.
    ///
    /// `/health` is mounted both at the root (for load balancers) and
    /// under `/api` alongside everything else.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api",
                routes::api_router().route("/health", get(health_handler)),
            )
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Bind and serve until the shutdown token fires.
    pub async fn listen(&self) -> std::io::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!(addr = %listener.local_addr()?, "mosaic api listening");

        let token = self.shutdown.token();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
    }

    /// Get the shutdown coordinator.
    #[must_use]
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(state.start_time))
}
