//! Journal entry repository.
//!
//! Read queries that serve another user's view go through the shared
//! visibility predicate: authors always see their own entries, other
//! users see `shared` entries only through a task on a board they
//! belong to.

use std::fmt::Write as _;

use mosaic_core::EntryId;
use mosaic_core::time::now_iso;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::repositories::{ENTRY_VISIBLE_SQL, TASK_ACCESSIBLE_SQL};
use crate::rows::EntryRow;

/// Options for creating a journal entry.
#[derive(Debug, Clone)]
pub struct EntryCreateOptions<'a> {
    /// Entry author.
    pub author_id: &'a str,
    /// Optional task the entry reflects on.
    pub task_id: Option<&'a str>,
    /// Entry title.
    pub title: &'a str,
    /// Entry body.
    pub content: &'a str,
    /// Mood valence in [-1.0, 1.0].
    pub valence: f64,
    /// Mood arousal in [-1.0, 1.0].
    pub arousal: f64,
    /// `private` or `shared`.
    pub visibility: &'a str,
}

/// Options for partially updating a journal entry. `None` leaves a field
/// unchanged; `task_id` uses a second `Option` level so callers can
/// detach the entry from its task.
#[derive(Debug, Clone, Default)]
pub struct EntryUpdateOptions<'a> {
    /// New title.
    pub title: Option<&'a str>,
    /// New body.
    pub content: Option<&'a str>,
    /// New valence.
    pub valence: Option<f64>,
    /// New arousal.
    pub arousal: Option<f64>,
    /// New visibility.
    pub visibility: Option<&'a str>,
    /// `Some(None)` detaches the task, `Some(Some(_))` re-links.
    pub task_id: Option<Option<&'a str>>,
}

/// Journal entry repository — stateless, every method takes `&Connection`.
pub struct EntryRepo;

impl EntryRepo {
    /// Create a journal entry.
    pub fn create(conn: &Connection, options: &EntryCreateOptions<'_>) -> Result<EntryRow> {
        let id = EntryId::new().into_inner();
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO journal_entries (id, author_id, task_id, title, content,
                                          valence, arousal, visibility, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                options.author_id,
                options.task_id,
                options.title,
                options.content,
                options.valence,
                options.arousal,
                options.visibility,
                now,
                now,
            ],
        )?;

        Ok(EntryRow {
            id,
            author_id: options.author_id.to_string(),
            task_id: options.task_id.map(str::to_string),
            title: options.title.to_string(),
            content: options.content.to_string(),
            valence: options.valence,
            arousal: options.arousal,
            visibility: options.visibility.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get entry by ID without a visibility filter. Author-only paths
    /// (update, delete) use this and check authorship in the domain.
    pub fn get_by_id(conn: &Connection, entry_id: &str) -> Result<Option<EntryRow>> {
        let row = conn
            .query_row(
                "SELECT je.id, je.author_id, je.task_id, je.title, je.content,
                        je.valence, je.arousal, je.visibility, je.created_at, je.updated_at
                 FROM journal_entries je WHERE je.id = ?1",
                params![entry_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get entry by ID as seen by `viewer_id`. Non-visible entries come
    /// back as `None`, indistinguishable from absent ones.
    pub fn get_visible(
        conn: &Connection,
        viewer_id: &str,
        entry_id: &str,
    ) -> Result<Option<EntryRow>> {
        let sql = format!(
            "SELECT je.id, je.author_id, je.task_id, je.title, je.content,
                    je.valence, je.arousal, je.visibility, je.created_at, je.updated_at
             FROM journal_entries je
             WHERE je.id = ?2 AND {ENTRY_VISIBLE_SQL}"
        );
        let row = conn
            .query_row(&sql, params![viewer_id, entry_id], Self::map_row)
            .optional()?;
        Ok(row)
    }

    /// Entries visible to the viewer, newest first. Optional filters
    /// narrow to a task or a single visibility value.
    pub fn visible_to(
        conn: &Connection,
        viewer_id: &str,
        task_id: Option<&str>,
        visibility: Option<&str>,
    ) -> Result<Vec<EntryRow>> {
        let mut sql = format!(
            "SELECT je.id, je.author_id, je.task_id, je.title, je.content,
                    je.valence, je.arousal, je.visibility, je.created_at, je.updated_at
             FROM journal_entries je
             WHERE {ENTRY_VISIBLE_SQL}"
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> =
            vec![Box::new(viewer_id.to_string())];

        if let Some(task_id) = task_id {
            let _ = write!(sql, " AND je.task_id = ?{}", param_values.len() + 1);
            param_values.push(Box::new(task_id.to_string()));
        }
        if let Some(visibility) = visibility {
            let _ = write!(sql, " AND je.visibility = ?{}", param_values.len() + 1);
            param_values.push(Box::new(visibility.to_string()));
        }
        sql.push_str(" ORDER BY je.created_at DESC, je.id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(AsRef::as_ref).collect();
        let rows = stmt
            .query_map(params_refs.as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Partially update an entry. Always bumps `updated_at`. Returns
    /// whether a row matched.
    pub fn update(
        conn: &Connection,
        entry_id: &str,
        options: &EntryUpdateOptions<'_>,
    ) -> Result<bool> {
        let mut sql = String::from("UPDATE journal_entries SET updated_at = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(now_iso())];

        if let Some(title) = options.title {
            let _ = write!(sql, ", title = ?{}", param_values.len() + 1);
            param_values.push(Box::new(title.to_string()));
        }
        if let Some(content) = options.content {
            let _ = write!(sql, ", content = ?{}", param_values.len() + 1);
            param_values.push(Box::new(content.to_string()));
        }
        if let Some(valence) = options.valence {
            let _ = write!(sql, ", valence = ?{}", param_values.len() + 1);
            param_values.push(Box::new(valence));
        }
        if let Some(arousal) = options.arousal {
            let _ = write!(sql, ", arousal = ?{}", param_values.len() + 1);
            param_values.push(Box::new(arousal));
        }
        if let Some(visibility) = options.visibility {
            let _ = write!(sql, ", visibility = ?{}", param_values.len() + 1);
            param_values.push(Box::new(visibility.to_string()));
        }
        if let Some(task_id) = &options.task_id {
            let _ = write!(sql, ", task_id = ?{}", param_values.len() + 1);
            param_values.push(Box::new(task_id.map(str::to_string)));
        }

        let _ = write!(sql, " WHERE id = ?{}", param_values.len() + 1);
        param_values.push(Box::new(entry_id.to_string()));

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(AsRef::as_ref).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;
        Ok(changed > 0)
    }

    /// Delete an entry.
    pub fn delete(conn: &Connection, entry_id: &str) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM journal_entries WHERE id = ?1",
            params![entry_id],
        )?;
        Ok(changed > 0)
    }

    /// Whether the viewer belongs to the board holding `task_id`. Used to
    /// validate task references before linking an entry.
    pub fn viewer_shares_task_board(
        conn: &Connection,
        viewer_id: &str,
        task_id: &str,
    ) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM tasks t WHERE t.id = ?2 AND {TASK_ACCESSIBLE_SQL})"
        );
        let exists: bool = conn.query_row(&sql, params![viewer_id, task_id], |row| row.get(0))?;
        Ok(exists)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EntryRow> {
        Ok(EntryRow {
            id: row.get("id")?,
            author_id: row.get("author_id")?,
            task_id: row.get("task_id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            valence: row.get("valence")?,
            arousal: row.get("arousal")?,
            visibility: row.get("visibility")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
