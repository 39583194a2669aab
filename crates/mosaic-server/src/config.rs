//! Server configuration.

use mosaic_settings::MosaicSettings;
use serde::{Deserialize, Serialize};

/// Configuration for the Mosaic server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            shutdown_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Build a config from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &MosaicSettings) -> Self {
        Self {
            host: settings.server.host.clone(),
            port: settings.server.port,
            ..Self::default()
        }
    }
}
