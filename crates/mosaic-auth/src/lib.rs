//! # mosaic-auth
//!
//! Credential handling for the Mosaic API:
//!
//! - **Passwords**: salted, iterated SHA-256 hashes in a self-describing
//!   `sha256-iter$…` format ([`password`])
//! - **Tokens**: HS256 access/refresh JWT pairs with a `kind` claim so the
//!   two cannot be swapped for each other ([`tokens`])
//!
//! The crate is deliberately free of storage and HTTP concerns; callers
//! decide where hashes live and how tokens travel.

#![deny(unsafe_code)]

pub mod errors;
pub mod password;
pub mod tokens;

pub use errors::AuthError;
pub use password::{hash_password, verify_password};
pub use tokens::{Claims, TokenPair, TokenService};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
