//! # mosaic-db
//!
//! SQLite persistence for the Mosaic backend.
//!
//! - [`connection`]: r2d2 connection pool with WAL mode, foreign keys, and
//!   performance pragmas applied to every connection
//! - [`migrations`]: versioned, idempotent schema migrations tracked in a
//!   `schema_version` table
//! - [`rows`]: raw row structs mirroring the table shapes
//! - [`repositories`]: stateless repositories — every method takes a
//!   `&Connection`, so callers control transactions
//!
//! Higher-level invariants (contiguous positions, visibility scoping of
//! mutations) live in `mosaic-domain`; this crate only guarantees what the
//! schema can express.

#![deny(unsafe_code)]

pub mod connection;
pub mod errors;
pub mod migrations;
pub mod repositories;
pub mod rows;

pub use connection::{
    ConnectionConfig, ConnectionPool, PooledConnection, PragmaState, new_file, new_in_memory,
    verify_pragmas,
};
pub use errors::{Result, StoreError};
pub use migrations::run_migrations;
