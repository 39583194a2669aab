//! Database row types for mapping between `SQLite` rows and Rust structs.
//!
//! These represent the raw table shape — not the API response types.
//! Conversion to response shapes (nested boards, assignee lists, computed
//! `is_overdue`) happens in the domain layer.

use serde::{Deserialize, Serialize};

/// Raw user row from the `users` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRow {
    /// User ID.
    pub id: String,
    /// Unique username.
    pub username: String,
    /// Salted password hash (never serialized to API responses).
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw board row from the `boards` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardRow {
    /// Board ID.
    pub id: String,
    /// Board name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw list row from the `lists` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListRow {
    /// List ID.
    pub id: String,
    /// Owning board.
    pub board_id: String,
    /// List name.
    pub name: String,
    /// Zero-based rank within the board.
    pub position: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw task row from the `tasks` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRow {
    /// Task ID.
    pub id: String,
    /// Owning list.
    pub list_id: String,
    /// Task title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional due timestamp.
    pub due_date: Option<String>,
    /// Priority on the 1..=3 scale.
    pub priority: i64,
    /// Complexity on the 1..=3 scale.
    pub complexity: i64,
    /// Zero-based rank within the list.
    pub position: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Raw journal entry row from the `journal_entries` table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntryRow {
    /// Entry ID.
    pub id: String,
    /// Author user ID.
    pub author_id: String,
    /// Optional task reference (weak: survives task deletion as NULL).
    pub task_id: Option<String>,
    /// Entry title.
    pub title: String,
    /// Entry body.
    pub content: String,
    /// Mood valence in [-1.0, 1.0].
    pub valence: f64,
    /// Mood arousal in [-1.0, 1.0].
    pub arousal: f64,
    /// `"private"` or `"shared"`.
    pub visibility: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
