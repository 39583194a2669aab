//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`MosaicSettings::default()`]
//! 2. If `~/.mosaic/settings.json` exists, deep-merge user values over
//!    defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::MosaicSettings;

/// Resolve the path to the settings file (`~/.mosaic/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".mosaic").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<MosaicSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<MosaicSettings> {
    let defaults = serde_json::to_value(MosaicSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: MosaicSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules:
/// - Integers must be valid and within the specified range
/// - Invalid values are silently ignored (fall back to file/default)
pub fn apply_env_overrides(settings: &mut MosaicSettings) {
    // ── Server settings ─────────────────────────────────────────────
    if let Some(v) = read_env_string("MOSAIC_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("MOSAIC_PORT", 1, 65535) {
        settings.server.port = v;
    }

    // ── Database settings ───────────────────────────────────────────
    if let Some(v) = read_env_string("MOSAIC_DB") {
        settings.database.path = v;
    }
    if let Some(v) = read_env_u32("MOSAIC_DB_POOL_SIZE", 1, 128) {
        settings.database.pool_size = v;
    }
    if let Some(v) = read_env_u32("MOSAIC_DB_BUSY_TIMEOUT_MS", 100, 600_000) {
        settings.database.busy_timeout_ms = v;
    }

    // ── Auth settings ───────────────────────────────────────────────
    if let Some(v) = read_env_string("MOSAIC_JWT_SECRET") {
        settings.auth.jwt_secret = v;
    }
    if let Some(v) = read_env_i64("MOSAIC_ACCESS_TTL_SECS", 60, 86_400) {
        settings.auth.access_ttl_secs = v;
    }
    if let Some(v) = read_env_i64("MOSAIC_REFRESH_TTL_SECS", 3600, 31_536_000) {
        settings.auth.refresh_ttl_secs = v;
    }

    // ── Logging settings ────────────────────────────────────────────
    if let Some(v) = read_env_string("MOSAIC_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as an `i64` within a range.
pub fn parse_i64_range(val: &str, min: i64, max: i64) -> Option<i64> {
    let n: i64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u32(name: &str, min: u32, max: u32) -> Option<u32> {
    let val = std::env::var(name).ok()?;
    let result = parse_u32_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_env_i64(name: &str, min: i64, max: i64) -> Option<i64> {
    let val = std::env::var(name).ok()?;
    let result = parse_i64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid i64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
