//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the JSON
//! wire format. Each type implements [`Default`] with production default
//! values. Types marked with `#[serde(default)]` allow partial JSON —
//! missing fields get their default value during deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the Mosaic backend.
///
/// Loaded from `~/.mosaic/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
///
/// # JSON Format
///
/// All field names are camelCase. Example:
///
/// ```json
/// {
///   "version": "0.1.0",
///   "server": { "port": 8000 },
///   "auth": { "jwtSecret": "…" }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MosaicSettings {
    /// Settings schema version.
    pub version: String,
    /// Application name.
    pub name: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// `SQLite` storage settings.
    pub database: DatabaseSettings,
    /// Token issuing and credential hashing settings.
    pub auth: AuthSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl Default for MosaicSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            name: "mosaic".to_string(),
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            auth: AuthSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// HTTP server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// `SQLite` storage settings.
///
/// The pool fields mirror `mosaic_db::ConnectionConfig` and share its
/// defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// Path to the database file.
    pub path: String,
    /// Maximum pool size.
    pub pool_size: u32,
    /// Busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
    /// Page cache size in KiB.
    pub cache_size_kib: i64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "mosaic.db".to_string(),
            pool_size: 16,
            busy_timeout_ms: 30_000,
            cache_size_kib: 8192,
        }
    }
}

/// Token issuing settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthSettings {
    /// HMAC secret for signing tokens.
    ///
    /// The compiled default exists for local development only; deployments
    /// must set `MOSAIC_JWT_SECRET` or the `jwtSecret` file key.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: "mosaic-dev-secret-change-me".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 604_800,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Log level filter (`error`, `warn`, `info`, `debug`, `trace`).
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
