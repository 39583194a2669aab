//! UTC timestamp helpers.
//!
//! Timestamps are stored as ISO-8601 `TEXT` (`%Y-%m-%dT%H:%M:%SZ`), always
//! UTC. Fixed-width UTC strings compare lexicographically, which keeps
//! `ORDER BY created_at` and range filters in SQL correct without any date
//! parsing on the database side.

use chrono::{DateTime, Utc};

/// Current UTC time as an ISO-8601 string.
#[must_use]
pub fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Format a `DateTime<Utc>` in the canonical stored form.
#[must_use]
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse an RFC 3339 / ISO-8601 timestamp, normalizing to UTC.
///
/// Accepts offset forms (`2026-03-01T10:00:00+02:00`); returns `None` for
/// anything unparseable.
#[must_use]
pub fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether a stored timestamp lies strictly in the past.
///
/// Unparseable input is treated as not-past.
#[must_use]
pub fn is_past(s: &str) -> bool {
    parse_iso(s).is_some_and(|dt| dt < Utc::now())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
