//! # mosaic-server
//!
//! HTTP API for the Mosaic backend: boards, lists, tasks, journal
//! entries, and mood reports over Axum.
//!
//! - [`server`]: [`MosaicServer`] — router assembly and the serve loop
//! - [`routes`]: endpoint handlers grouped by resource
//! - [`dto`]: request/response bodies (wire shapes)
//! - [`extract`]: [`CurrentUser`] bearer-token extractor
//! - [`error`]: [`ApiError`] and the `{code, message}` error body
//! - [`state`]: shared [`AppState`] and the blocking database bridge
//! - [`shutdown`]: graceful shutdown coordination
//!
//! All `/api` routes except `/api/register`, `/api/login`, and
//! `/api/token/refresh` require a bearer access token.

#![deny(unsafe_code)]

pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod health;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use extract::CurrentUser;
pub use health::HealthResponse;
pub use server::MosaicServer;
pub use shutdown::ShutdownCoordinator;
pub use state::AppState;
