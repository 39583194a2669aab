//! Domain error types.
//!
//! The server maps these onto HTTP statuses one-to-one: `Validation` →
//! 400, `Unauthorized` → 401, `NotFound` → 404, `Store` → 500. There is
//! deliberately no Forbidden variant — read paths degrade inaccessible
//! entities to `NotFound` so responses never reveal what exists.

use mosaic_db::StoreError;

/// Errors produced by the domain services.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Storage layer failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Entity absent, or present but not visible to the requester.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity type (e.g., "Board", "Task").
        entity: &'static str,
        /// The ID that was looked up.
        id: String,
    },

    /// Request payload failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credentials rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl DomainError {
    /// Create a not-found error for a user.
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "User",
            id: id.into(),
        }
    }

    /// Create a not-found error for a board.
    pub fn board_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Board",
            id: id.into(),
        }
    }

    /// Create a not-found error for a list.
    pub fn list_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "List",
            id: id.into(),
        }
    }

    /// Create a not-found error for a task.
    pub fn task_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Task",
            id: id.into(),
        }
    }

    /// Create a not-found error for a journal entry.
    pub fn entry_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Journal entry",
            id: id.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Store(StoreError::from(err))
    }
}

/// Domain result alias.
pub type Result<T> = std::result::Result<T, DomainError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
