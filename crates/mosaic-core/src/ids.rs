//! Branded ID newtypes for type safety.
//!
//! Every entity in the Mosaic system has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing a
//! board ID where a list ID is expected.
//!
//! IDs are prefixed UUID v7 strings (`usr_…`, `brd_…`, `lst_…`, `tsk_…`,
//! `jrn_…`) — time-ordered, so freshly created rows sort by creation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// The prefix new IDs of this type carry.
            pub const PREFIX: &'static str = $prefix;

            /// Create a new random ID (`prefix_` + UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(format!(concat!($prefix, "_{}"), Uuid::now_v7()))
            }

            /// Create from an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a user account.
    UserId, "usr"
}

branded_id! {
    /// Unique identifier for a board.
    BoardId, "brd"
}

branded_id! {
    /// Unique identifier for a list within a board.
    ListId, "lst"
}

branded_id! {
    /// Unique identifier for a task within a list.
    TaskId, "tsk"
}

branded_id! {
    /// Unique identifier for a journal entry.
    EntryId, "jrn"
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_has_prefix() {
        let id = UserId::new();
        assert!(id.as_str().starts_with("usr_"));
    }

    #[test]
    fn board_id_suffix_is_uuid_v7() {
        let id = BoardId::new();
        let suffix = id.as_str().strip_prefix("brd_").unwrap();
        let parsed = Uuid::parse_str(suffix).expect("should be valid UUID");
        assert_eq!(parsed.get_version(), Some(uuid::Version::SortRand));
    }

    #[test]
    fn each_type_uses_its_own_prefix() {
        assert!(ListId::new().starts_with("lst_"));
        assert!(TaskId::new().starts_with("tsk_"));
        assert!(EntryId::new().starts_with("jrn_"));
    }

    #[test]
    fn ids_are_unique() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn from_string() {
        let id = BoardId::from_string("custom-id".to_owned());
        assert_eq!(id.as_str(), "custom-id");
    }

    #[test]
    fn deref_to_str() {
        let id = UserId::from("hello");
        let s: &str = &id;
        assert_eq!(s, "hello");
    }

    #[test]
    fn display() {
        let id = EntryId::from("display-me");
        assert_eq!(format!("{id}"), "display-me");
    }

    #[test]
    fn into_string() {
        let id = ListId::from("convert");
        let s: String = id.into();
        assert_eq!(s, "convert");
    }

    #[test]
    fn serde_is_transparent() {
        let id = TaskId::from("serde-test");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"serde-test\"");
        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn hash_and_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        let id = UserId::from("same");
        let _ = set.insert(id.clone());
        let _ = set.insert(id.clone());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn default_creates_new() {
        let id1 = BoardId::default();
        let id2 = BoardId::default();
        assert_ne!(id1, id2, "default should create unique IDs");
    }

    #[test]
    fn into_inner() {
        let id = EntryId::from("inner-test");
        assert_eq!(id.into_inner(), "inner-test");
    }
}
