//! Board repository — boards and board membership.

use std::collections::HashMap;

use mosaic_core::BoardId;
use mosaic_core::time::now_iso;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::rows::{BoardRow, UserRow};

/// Board repository — stateless, every method takes `&Connection`.
pub struct BoardRepo;

impl BoardRepo {
    /// Create a new board. Membership is added separately.
    pub fn create(conn: &Connection, name: &str) -> Result<BoardRow> {
        let id = BoardId::new().into_inner();
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO boards (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![id, name, now],
        )?;

        Ok(BoardRow {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Get board by ID.
    pub fn get_by_id(conn: &Connection, board_id: &str) -> Result<Option<BoardRow>> {
        let row = conn
            .query_row(
                "SELECT id, name, created_at FROM boards WHERE id = ?1",
                params![board_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Boards the user is a member of, oldest first.
    pub fn list_for_user(conn: &Connection, user_id: &str) -> Result<Vec<BoardRow>> {
        let mut stmt = conn.prepare(
            "SELECT b.id, b.name, b.created_at
             FROM boards b
             JOIN board_members bm ON bm.board_id = b.id
             WHERE bm.user_id = ?1
             ORDER BY b.created_at ASC, b.id ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rename a board.
    pub fn rename(conn: &Connection, board_id: &str, name: &str) -> Result<bool> {
        let changed = conn.execute(
            "UPDATE boards SET name = ?1 WHERE id = ?2",
            params![name, board_id],
        )?;
        Ok(changed > 0)
    }

    /// Delete a board. Lists and tasks cascade at the schema level.
    pub fn delete(conn: &Connection, board_id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM boards WHERE id = ?1", params![board_id])?;
        Ok(changed > 0)
    }

    /// Add a member to a board. Adding an existing member is a no-op.
    pub fn add_member(conn: &Connection, board_id: &str, user_id: &str) -> Result<()> {
        let _ = conn.execute(
            "INSERT OR IGNORE INTO board_members (board_id, user_id, added_at) VALUES (?1, ?2, ?3)",
            params![board_id, user_id, now_iso()],
        )?;
        Ok(())
    }

    /// Whether the user belongs to the board.
    pub fn is_member(conn: &Connection, board_id: &str, user_id: &str) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM board_members WHERE board_id = ?1 AND user_id = ?2)",
            params![board_id, user_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Members of a board, ordered by username.
    pub fn members(conn: &Connection, board_id: &str) -> Result<Vec<UserRow>> {
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.password_hash, u.created_at
             FROM users u
             JOIN board_members bm ON bm.user_id = u.id
             WHERE bm.board_id = ?1
             ORDER BY u.username ASC",
        )?;
        let rows = stmt
            .query_map(params![board_id], map_user_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Batch-fetch members for several boards in one query.
    ///
    /// Returns `board_id → members (by username)`. Boards without members
    /// are absent from the map.
    pub fn members_for_boards(
        conn: &Connection,
        board_ids: &[&str],
    ) -> Result<HashMap<String, Vec<UserRow>>> {
        let mut result: HashMap<String, Vec<UserRow>> = HashMap::new();
        if board_ids.is_empty() {
            return Ok(result);
        }

        let placeholders: Vec<String> = (1..=board_ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT bm.board_id, u.id, u.username, u.password_hash, u.created_at
             FROM board_members bm
             JOIN users u ON u.id = bm.user_id
             WHERE bm.board_id IN ({})
             ORDER BY u.username ASC",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::types::ToSql> = board_ids
            .iter()
            .map(|s| s as &dyn rusqlite::types::ToSql)
            .collect();
        let rows = stmt
            .query_map(params.as_slice(), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    UserRow {
                        id: row.get(1)?,
                        username: row.get(2)?,
                        password_hash: row.get(3)?,
                        created_at: row.get(4)?,
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (board_id, user) in rows {
            result.entry(board_id).or_default().push(user);
        }
        Ok(result)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BoardRow> {
        Ok(BoardRow {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
