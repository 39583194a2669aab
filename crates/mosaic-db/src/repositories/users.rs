//! User repository — account rows and membership-derived lookups.

use std::collections::HashMap;

use mosaic_core::UserId;
use mosaic_core::time::now_iso;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::rows::UserRow;

/// User repository — stateless, every method takes `&Connection`.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. The username must be unique (schema-enforced);
    /// callers check availability first for a friendly error.
    pub fn create(conn: &Connection, username: &str, password_hash: &str) -> Result<UserRow> {
        let id = UserId::new().into_inner();
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![id, username, password_hash, now],
        )?;

        Ok(UserRow {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
        })
    }

    /// Get user by ID.
    pub fn get_by_id(conn: &Connection, user_id: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE id = ?1",
                params![user_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Get user by username.
    pub fn get_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
        let row = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Batch-fetch users by IDs.
    ///
    /// Returns a map of `user_id → UserRow`. Missing IDs are silently omitted.
    pub fn get_by_ids(conn: &Connection, user_ids: &[&str]) -> Result<HashMap<String, UserRow>> {
        let mut result = HashMap::new();
        if user_ids.is_empty() {
            return Ok(result);
        }

        let placeholders: Vec<String> = (1..=user_ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT id, username, password_hash, created_at FROM users WHERE id IN ({})",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::types::ToSql> = user_ids
            .iter()
            .map(|s| s as &dyn rusqlite::types::ToSql)
            .collect();
        let rows = stmt
            .query_map(params.as_slice(), Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for row in rows {
            let _ = result.insert(row.id.clone(), row);
        }
        Ok(result)
    }

    /// Whether every ID in the slice names an existing user.
    pub fn all_exist(conn: &Connection, user_ids: &[&str]) -> Result<bool> {
        if user_ids.is_empty() {
            return Ok(true);
        }
        let found = Self::get_by_ids(conn, user_ids)?;
        Ok(user_ids.iter().all(|id| found.contains_key(*id)))
    }

    /// Users sharing at least one board with `user_id`, excluding the user,
    /// ordered by username.
    pub fn sharing_board_with(conn: &Connection, user_id: &str) -> Result<Vec<UserRow>> {
        let mut stmt = conn.prepare(
            "SELECT DISTINCT u.id, u.username, u.password_hash, u.created_at
             FROM users u
             JOIN board_members bm ON bm.user_id = u.id
             WHERE bm.board_id IN (SELECT board_id FROM board_members WHERE user_id = ?1)
               AND u.id != ?1
             ORDER BY u.username ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
        Ok(UserRow {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            created_at: row.get("created_at")?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
