//! # mosaic-backend
//!
//! Mosaic backend server binary — wires settings, database, auth, and the
//! HTTP server together.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mosaic_auth::TokenService;
use mosaic_db::ConnectionConfig;
use mosaic_server::{AppState, MosaicServer, ServerConfig};
use mosaic_settings::{AuthSettings, MosaicSettings};

/// Mosaic backend server.
#[derive(Parser, Debug)]
#[command(name = "mosaic-backend", about = "Mosaic task and journal backend")]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings; 0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Path to the `SQLite` database (overrides settings).
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Log filter, e.g. `info` or `mosaic_server=debug` (overrides settings).
    #[arg(long)]
    log_level: Option<String>,
}

/// Resolve the database path: absolute settings paths are used as-is,
/// relative ones land under `~/.mosaic/`.
fn resolve_db_path(settings: &MosaicSettings) -> PathBuf {
    let configured = PathBuf::from(&settings.database.path);
    if configured.is_absolute() {
        return configured;
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".mosaic").join(configured)
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings = mosaic_settings::load_settings().unwrap_or_default();

    // Logging first so startup problems are visible.
    let filter = args
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Database
    let db_path = args.db_path.unwrap_or_else(|| resolve_db_path(&settings));
    ensure_parent_dir(&db_path)?;
    let db_config = ConnectionConfig {
        pool_size: settings.database.pool_size,
        busy_timeout_ms: settings.database.busy_timeout_ms,
        cache_size_kib: settings.database.cache_size_kib,
    };
    let pool = mosaic_db::new_file(&db_path.to_string_lossy(), &db_config)
        .context("Failed to open database")?;
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        let applied = mosaic_db::run_migrations(&conn).context("Failed to run migrations")?;
        tracing::info!(path = %db_path.display(), applied, "database ready");
    }

    // Tokens
    if settings.auth.jwt_secret == AuthSettings::default().jwt_secret {
        tracing::warn!(
            "running with the built-in JWT secret; set MOSAIC_JWT_SECRET in production"
        );
    }
    let tokens = TokenService::new(
        &settings.auth.jwt_secret,
        settings.auth.access_ttl_secs,
        settings.auth.refresh_ttl_secs,
    );

    // Server
    let config = ServerConfig {
        host: args.host.unwrap_or(settings.server.host),
        port: args.port.unwrap_or(settings.server.port),
        ..ServerConfig::default()
    };
    let state = AppState::new(pool, tokens);
    let server = MosaicServer::new(config, state);

    // Ctrl-C fires the shutdown token; listen() returns once in-flight
    // requests drain.
    let shutdown = server.shutdown().clone();
    drop(tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "ctrl-c handler failed");
            return;
        }
        tracing::info!("shutting down");
        shutdown.shutdown();
    }));

    server.listen().await.context("server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}
