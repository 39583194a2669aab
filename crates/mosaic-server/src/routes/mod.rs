//! REST route handlers, one module per resource.

pub mod auth;
pub mod boards;
pub mod journal;
pub mod lists;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// All routes mounted under `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(boards::router())
        .merge(lists::router())
        .merge(tasks::router())
        .merge(journal::router())
}
