//! Shared application state and the blocking database bridge.

use std::sync::Arc;
use std::time::Instant;

use mosaic_auth::TokenService;
use mosaic_db::{ConnectionPool, StoreError};
use rusqlite::Connection;
use tokio::task;

use crate::error::ApiError;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// `SQLite` connection pool.
    pub pool: ConnectionPool,
    /// Token signer/verifier.
    pub tokens: Arc<TokenService>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    /// Create state from a pool and token service.
    #[must_use]
    pub fn new(pool: ConnectionPool, tokens: TokenService) -> Self {
        Self {
            pool,
            tokens: Arc::new(tokens),
            start_time: Instant::now(),
        }
    }
}

/// Run a domain operation on a pooled connection inside
/// `spawn_blocking`.
///
/// `SQLite` calls are synchronous; doing them on the async runtime would
/// stall other requests, so every handler funnels through here.
pub(crate) async fn with_conn<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> mosaic_domain::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.pool.clone();
    let result = task::spawn_blocking(move || {
        let conn = pool.get().map_err(StoreError::from)?;
        f(&conn)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("database task failed: {err}")))?;
    result.map_err(ApiError::from)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
