//! List repository — ordered task lists within a board.
//!
//! Positions are zero-based and contiguous per board. The renumbering
//! helpers (`decrement_after`, `increment_from`) are building blocks for
//! the domain-level move operation and are not safe to call outside a
//! transaction that restores contiguity.

use mosaic_core::ListId;
use mosaic_core::time::now_iso;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::rows::ListRow;

/// List repository — stateless, every method takes `&Connection`.
pub struct ListRepo;

impl ListRepo {
    /// Create a list at the given position within a board.
    pub fn create(conn: &Connection, board_id: &str, name: &str, position: i64) -> Result<ListRow> {
        let id = ListId::new().into_inner();
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO lists (id, board_id, name, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, board_id, name, position, now],
        )?;

        Ok(ListRow {
            id,
            board_id: board_id.to_string(),
            name: name.to_string(),
            position,
            created_at: now,
        })
    }

    /// Get list by ID.
    pub fn get_by_id(conn: &Connection, list_id: &str) -> Result<Option<ListRow>> {
        let row = conn
            .query_row(
                "SELECT id, board_id, name, position, created_at FROM lists WHERE id = ?1",
                params![list_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Lists of a board in position order.
    pub fn for_board(conn: &Connection, board_id: &str) -> Result<Vec<ListRow>> {
        let mut stmt = conn.prepare(
            "SELECT id, board_id, name, position, created_at
             FROM lists WHERE board_id = ?1
             ORDER BY position ASC",
        )?;
        let rows = stmt
            .query_map(params![board_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Lists on every board the user is a member of, grouped by board.
    pub fn for_user(conn: &Connection, user_id: &str) -> Result<Vec<ListRow>> {
        let mut stmt = conn.prepare(
            "SELECT l.id, l.board_id, l.name, l.position, l.created_at
             FROM lists l
             JOIN board_members bm ON bm.board_id = l.board_id
             WHERE bm.user_id = ?1
             ORDER BY l.board_id ASC, l.position ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of lists on a board.
    pub fn count_for_board(conn: &Connection, board_id: &str) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM lists WHERE board_id = ?1",
            params![board_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Rename a list.
    pub fn rename(conn: &Connection, list_id: &str, name: &str) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE lists SET name = ?1 WHERE id = ?2",
            params![name, list_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a list. Its tasks cascade at the schema level.
    pub fn delete(conn: &Connection, list_id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM lists WHERE id = ?1", params![list_id])?;
        Ok(changed > 0)
    }

    /// Set a single list's position.
    pub fn set_position(conn: &Connection, list_id: &str, position: i64) -> Result<()> {
        let _ = conn.execute(
            "UPDATE lists SET position = ?1 WHERE id = ?2",
            params![position, list_id],
        )?;
        Ok(())
    }

    /// Shift lists after a removed slot down by one.
    pub fn decrement_after(conn: &Connection, board_id: &str, position: i64) -> Result<()> {
        let _ = conn.execute(
            "UPDATE lists SET position = position - 1
             WHERE board_id = ?1 AND position > ?2",
            params![board_id, position],
        )?;
        Ok(())
    }

    /// Shift lists at or after an inserted slot up by one, skipping the
    /// list being moved.
    pub fn increment_from(
        conn: &Connection,
        board_id: &str,
        position: i64,
        exclude_id: &str,
    ) -> Result<()> {
        let _ = conn.execute(
            "UPDATE lists SET position = position + 1
             WHERE board_id = ?1 AND position >= ?2 AND id != ?3",
            params![board_id, position, exclude_id],
        )?;
        Ok(())
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ListRow> {
        Ok(ListRow {
            id: row.get("id")?,
            board_id: row.get("board_id")?,
            name: row.get("name")?,
            position: row.get("position")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
