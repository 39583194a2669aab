//! Shared model vocabulary: journal visibility, scales, mood range.

use serde::{Deserialize, Serialize};

/// Lowest value of the priority/complexity scale.
pub const SCALE_MIN: i64 = 1;
/// Highest value of the priority/complexity scale.
pub const SCALE_MAX: i64 = 3;

/// Lower bound of the valence/arousal mood range.
pub const MOOD_MIN: f64 = -1.0;
/// Upper bound of the valence/arousal mood range.
pub const MOOD_MAX: f64 = 1.0;

/// Whether a priority or complexity value is on the 1..=3 scale.
#[must_use]
pub fn scale_in_range(value: i64) -> bool {
    (SCALE_MIN..=SCALE_MAX).contains(&value)
}

/// Whether a valence or arousal value is inside the mood range.
///
/// NaN is rejected.
#[must_use]
pub fn mood_in_range(value: f64) -> bool {
    value >= MOOD_MIN && value <= MOOD_MAX
}

/// Who may read a journal entry besides its author.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Author only.
    Private,
    /// Readable by members of the entry's task's board.
    Shared,
}

impl Visibility {
    /// SQL string representation.
    #[must_use]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Shared => "shared",
        }
    }

    /// Parse from the SQL/wire string; `None` for anything else.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "private" => Some(Self::Private),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_bounds() {
        assert!(scale_in_range(1));
        assert!(scale_in_range(2));
        assert!(scale_in_range(3));
        assert!(!scale_in_range(0));
        assert!(!scale_in_range(4));
        assert!(!scale_in_range(-1));
    }

    #[test]
    fn mood_bounds() {
        assert!(mood_in_range(-1.0));
        assert!(mood_in_range(0.0));
        assert!(mood_in_range(0.7));
        assert!(mood_in_range(1.0));
        assert!(!mood_in_range(1.01));
        assert!(!mood_in_range(-1.5));
    }

    #[test]
    fn mood_rejects_nan() {
        assert!(!mood_in_range(f64::NAN));
    }

    #[test]
    fn visibility_sql_roundtrip() {
        assert_eq!(Visibility::parse("private"), Some(Visibility::Private));
        assert_eq!(Visibility::parse("shared"), Some(Visibility::Shared));
        assert_eq!(Visibility::Private.as_sql(), "private");
        assert_eq!(Visibility::Shared.as_sql(), "shared");
    }

    #[test]
    fn visibility_rejects_unknown() {
        assert_eq!(Visibility::parse("public"), None);
        assert_eq!(Visibility::parse("PRIVATE"), None);
        assert_eq!(Visibility::parse(""), None);
    }

    #[test]
    fn visibility_serde_lowercase() {
        let json = serde_json::to_string(&Visibility::Shared).unwrap();
        assert_eq!(json, "\"shared\"");
        let back: Visibility = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(back, Visibility::Private);
    }
}
