//! Task repository — ordered tasks within lists, plus assignees.

use std::collections::HashMap;
use std::fmt::Write as _;

use mosaic_core::TaskId;
use mosaic_core::time::now_iso;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::Result;
use crate::rows::{TaskRow, UserRow};

/// Options for creating a task.
#[derive(Debug, Clone)]
pub struct TaskCreateOptions<'a> {
    /// Owning list.
    pub list_id: &'a str,
    /// Task title.
    pub title: &'a str,
    /// Free-form description.
    pub description: &'a str,
    /// Optional due date (ISO-8601).
    pub due_date: Option<&'a str>,
    /// Priority on the 1..=3 scale.
    pub priority: i64,
    /// Complexity on the 1..=3 scale.
    pub complexity: i64,
    /// Zero-based position within the list.
    pub position: i64,
}

/// Options for partially updating a task. `None` leaves a field unchanged;
/// `due_date` uses a second `Option` level so callers can clear it.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdateOptions<'a> {
    /// New title.
    pub title: Option<&'a str>,
    /// New description.
    pub description: Option<&'a str>,
    /// `Some(None)` clears the due date, `Some(Some(_))` sets it.
    pub due_date: Option<Option<&'a str>>,
    /// New priority.
    pub priority: Option<i64>,
    /// New complexity.
    pub complexity: Option<i64>,
}

/// Task repository — stateless, every method takes `&Connection`.
pub struct TaskRepo;

impl TaskRepo {
    /// Create a task at the given position within a list.
    pub fn create(conn: &Connection, options: &TaskCreateOptions<'_>) -> Result<TaskRow> {
        let id = TaskId::new().into_inner();
        let now = now_iso();

        let _ = conn.execute(
            "INSERT INTO tasks (id, list_id, title, description, due_date,
                                priority, complexity, position, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id,
                options.list_id,
                options.title,
                options.description,
                options.due_date,
                options.priority,
                options.complexity,
                options.position,
                now,
                now,
            ],
        )?;

        Ok(TaskRow {
            id,
            list_id: options.list_id.to_string(),
            title: options.title.to_string(),
            description: options.description.to_string(),
            due_date: options.due_date.map(str::to_string),
            priority: options.priority,
            complexity: options.complexity,
            position: options.position,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get task by ID.
    pub fn get_by_id(conn: &Connection, task_id: &str) -> Result<Option<TaskRow>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                params![task_id],
                Self::map_row,
            )
            .optional()?;
        Ok(row)
    }

    /// Tasks of a list in position order.
    pub fn for_list(conn: &Connection, list_id: &str) -> Result<Vec<TaskRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM tasks WHERE list_id = ?1 ORDER BY position ASC"
        ))?;
        let rows = stmt
            .query_map(params![list_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every task on a board, ordered by list position then task position.
    ///
    /// One query for the whole board so detail views do not fan out
    /// per list.
    pub fn for_board(conn: &Connection, board_id: &str) -> Result<Vec<TaskRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS_T} FROM tasks t
             JOIN lists l ON l.id = t.list_id
             WHERE l.board_id = ?1
             ORDER BY l.position ASC, t.position ASC"
        ))?;
        let rows = stmt
            .query_map(params![board_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Every task on every board the user is a member of.
    pub fn for_user(conn: &Connection, user_id: &str) -> Result<Vec<TaskRow>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS_T} FROM tasks t
             JOIN lists l ON l.id = t.list_id
             JOIN board_members bm ON bm.board_id = l.board_id
             WHERE bm.user_id = ?1
             ORDER BY l.board_id ASC, l.position ASC, t.position ASC"
        ))?;
        let rows = stmt
            .query_map(params![user_id], Self::map_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of tasks on a list.
    pub fn count_for_list(conn: &Connection, list_id: &str) -> Result<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE list_id = ?1",
            params![list_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Partially update a task. Always bumps `updated_at`. Returns whether
    /// a row matched.
    pub fn update(conn: &Connection, task_id: &str, options: &TaskUpdateOptions<'_>) -> Result<bool> {
        let mut sql = String::from("UPDATE tasks SET updated_at = ?1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![Box::new(now_iso())];

        if let Some(title) = options.title {
            let _ = write!(sql, ", title = ?{}", param_values.len() + 1);
            param_values.push(Box::new(title.to_string()));
        }
        if let Some(description) = options.description {
            let _ = write!(sql, ", description = ?{}", param_values.len() + 1);
            param_values.push(Box::new(description.to_string()));
        }
        if let Some(due_date) = &options.due_date {
            let _ = write!(sql, ", due_date = ?{}", param_values.len() + 1);
            param_values.push(Box::new(due_date.map(str::to_string)));
        }
        if let Some(priority) = options.priority {
            let _ = write!(sql, ", priority = ?{}", param_values.len() + 1);
            param_values.push(Box::new(priority));
        }
        if let Some(complexity) = options.complexity {
            let _ = write!(sql, ", complexity = ?{}", param_values.len() + 1);
            param_values.push(Box::new(complexity));
        }

        let _ = write!(sql, " WHERE id = ?{}", param_values.len() + 1);
        param_values.push(Box::new(task_id.to_string()));

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(AsRef::as_ref).collect();
        let changed = conn.execute(&sql, params_refs.as_slice())?;
        Ok(changed > 0)
    }

    /// Delete a task. Assignee rows cascade; journal entries detach.
    pub fn delete(conn: &Connection, task_id: &str) -> Result<bool> {
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
        Ok(changed > 0)
    }

    /// Shift tasks after a removed slot down by one.
    pub fn decrement_after(conn: &Connection, list_id: &str, position: i64) -> Result<()> {
        let _ = conn.execute(
            "UPDATE tasks SET position = position - 1
             WHERE list_id = ?1 AND position > ?2",
            params![list_id, position],
        )?;
        Ok(())
    }

    /// Shift tasks at or after an inserted slot up by one, skipping the
    /// task being moved.
    pub fn increment_from(
        conn: &Connection,
        list_id: &str,
        position: i64,
        exclude_id: &str,
    ) -> Result<()> {
        let _ = conn.execute(
            "UPDATE tasks SET position = position + 1
             WHERE list_id = ?1 AND position >= ?2 AND id != ?3",
            params![list_id, position, exclude_id],
        )?;
        Ok(())
    }

    /// Place a task into a list at a position. Used by moves after the
    /// surrounding slots have been renumbered.
    pub fn relocate(conn: &Connection, task_id: &str, list_id: &str, position: i64) -> Result<()> {
        let _ = conn.execute(
            "UPDATE tasks SET list_id = ?1, position = ?2, updated_at = ?3 WHERE id = ?4",
            params![list_id, position, now_iso(), task_id],
        )?;
        Ok(())
    }

    /// Replace the full assignee set of a task.
    pub fn set_assignees(conn: &Connection, task_id: &str, user_ids: &[&str]) -> Result<()> {
        let _ = conn.execute(
            "DELETE FROM task_assignees WHERE task_id = ?1",
            params![task_id],
        )?;
        for user_id in user_ids {
            let _ = conn.execute(
                "INSERT OR IGNORE INTO task_assignees (task_id, user_id) VALUES (?1, ?2)",
                params![task_id, user_id],
            )?;
        }
        Ok(())
    }

    /// Add one assignee. Re-adding is a no-op.
    pub fn add_assignee(conn: &Connection, task_id: &str, user_id: &str) -> Result<()> {
        let _ = conn.execute(
            "INSERT OR IGNORE INTO task_assignees (task_id, user_id) VALUES (?1, ?2)",
            params![task_id, user_id],
        )?;
        Ok(())
    }

    /// Assignees of a task, ordered by username.
    pub fn assignees(conn: &Connection, task_id: &str) -> Result<Vec<UserRow>> {
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, u.password_hash, u.created_at
             FROM users u
             JOIN task_assignees ta ON ta.user_id = u.id
             WHERE ta.task_id = ?1
             ORDER BY u.username ASC",
        )?;
        let rows = stmt
            .query_map(params![task_id], map_user_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Batch-fetch assignees for several tasks in one query.
    ///
    /// Returns `task_id → assignees (by username)`. Tasks without
    /// assignees are absent from the map.
    pub fn assignees_for_tasks(
        conn: &Connection,
        task_ids: &[&str],
    ) -> Result<HashMap<String, Vec<UserRow>>> {
        let mut result: HashMap<String, Vec<UserRow>> = HashMap::new();
        if task_ids.is_empty() {
            return Ok(result);
        }

        let placeholders: Vec<String> = (1..=task_ids.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "SELECT ta.task_id, u.id, u.username, u.password_hash, u.created_at
             FROM task_assignees ta
             JOIN users u ON u.id = ta.user_id
             WHERE ta.task_id IN ({})
             ORDER BY u.username ASC",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let params: Vec<&dyn rusqlite::types::ToSql> = task_ids
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

        for (task_id, user) in rows {
            result.entry(task_id).or_default().push(user);
        }
        Ok(result)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
        Ok(TaskRow {
            id: row.get("id")?,
            list_id: row.get("list_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            due_date: row.get("due_date")?,
            priority: row.get("priority")?,
            complexity: row.get("complexity")?,
            position: row.get("position")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

const COLUMNS: &str = "id, list_id, title, description, due_date, priority, complexity, \
                       position, created_at, updated_at";
const COLUMNS_T: &str = "t.id, t.list_id, t.title, t.description, t.due_date, t.priority, \
                         t.complexity, t.position, t.created_at, t.updated_at";

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

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::migrations::run_migrations;
    use crate::repositories::{BoardRepo, ListRepo, UserRepo};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
            .unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn list(conn: &Connection) -> String {
        let board = BoardRepo::create(conn, "B").unwrap();
        ListRepo::create(conn, &board.id, "L", 0).unwrap().id
    }

    fn task(conn: &Connection, list_id: &str, title: &str, position: i64) -> TaskRow {
        TaskRepo::create(
            conn,
            &TaskCreateOptions {
                list_id,
                title,
                description: "",
                due_date: None,
                priority: 2,
                complexity: 2,
                position,
            },
        )
        .unwrap()
    }

    #[test]
    fn create_and_get() {
        let conn = setup();
        let list_id = list(&conn);
        let created = TaskRepo::create(
            &conn,
            &TaskCreateOptions {
                list_id: &list_id,
                title: "Write report",
                description: "quarterly",
                due_date: Some("2026-09-01T00:00:00Z"),
                priority: 3,
                complexity: 1,
                position: 0,
            },
        )
        .unwrap();
        assert!(created.id.starts_with("tsk_"));

        let found = TaskRepo::get_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(found.title, "Write report");
        assert_eq!(found.due_date.as_deref(), Some("2026-09-01T00:00:00Z"));
        assert_eq!(found.priority, 3);
        assert_eq!(found.complexity, 1);
    }

    #[test]
    fn for_list_orders_by_position() {
        let conn = setup();
        let list_id = list(&conn);
        task(&conn, &list_id, "b", 1);
        task(&conn, &list_id, "a", 0);
        task(&conn, &list_id, "c", 2);

        let tasks = TaskRepo::for_list(&conn, &list_id).unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[test]
    fn for_board_spans_lists() {
        let conn = setup();
        let board = BoardRepo::create(&conn, "B").unwrap();
        let l1 = ListRepo::create(&conn, &board.id, "L1", 0).unwrap();
        let l2 = ListRepo::create(&conn, &board.id, "L2", 1).unwrap();
        task(&conn, &l2.id, "second-list", 0);
        task(&conn, &l1.id, "first-list", 0);

        let tasks = TaskRepo::for_board(&conn, &board.id).unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["first-list", "second-list"]);
    }

    #[test]
    fn update_partial_fields() {
        let conn = setup();
        let list_id = list(&conn);
        let created = task(&conn, &list_id, "Old", 0);

        let changed = TaskRepo::update(
            &conn,
            &created.id,
            &TaskUpdateOptions {
                title: Some("New"),
                priority: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(changed);

        let found = TaskRepo::get_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(found.title, "New");
        assert_eq!(found.priority, 1);
        assert_eq!(found.complexity, 2);
    }

    #[test]
    fn update_clears_due_date() {
        let conn = setup();
        let list_id = list(&conn);
        let created = TaskRepo::create(
            &conn,
            &TaskCreateOptions {
                list_id: &list_id,
                title: "t",
                description: "",
                due_date: Some("2026-01-01T00:00:00Z"),
                priority: 1,
                complexity: 1,
                position: 0,
            },
        )
        .unwrap();

        TaskRepo::update(
            &conn,
            &created.id,
            &TaskUpdateOptions {
                due_date: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

        let found = TaskRepo::get_by_id(&conn, &created.id).unwrap().unwrap();
        assert!(found.due_date.is_none());
    }

    #[test]
    fn update_missing_task_returns_false() {
        let conn = setup();
        let changed = TaskRepo::update(
            &conn,
            "tsk_nope",
            &TaskUpdateOptions {
                title: Some("x"),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!changed);
    }

    #[test]
    fn assignees_roundtrip() {
        let conn = setup();
        let list_id = list(&conn);
        let created = task(&conn, &list_id, "t", 0);
        let bob = UserRepo::create(&conn, "bob", "h").unwrap();
        let alice = UserRepo::create(&conn, "alice", "h").unwrap();

        TaskRepo::set_assignees(&conn, &created.id, &[bob.id.as_str(), alice.id.as_str()]).unwrap();
        let assigned = TaskRepo::assignees(&conn, &created.id).unwrap();
        let names: Vec<&str> = assigned.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);

        // Replacing shrinks the set.
        TaskRepo::set_assignees(&conn, &created.id, &[bob.id.as_str()]).unwrap();
        assert_eq!(TaskRepo::assignees(&conn, &created.id).unwrap().len(), 1);
    }

    #[test]
    fn add_assignee_is_idempotent() {
        let conn = setup();
        let list_id = list(&conn);
        let created = task(&conn, &list_id, "t", 0);
        let user = UserRepo::create(&conn, "u", "h").unwrap();

        TaskRepo::add_assignee(&conn, &created.id, &user.id).unwrap();
        TaskRepo::add_assignee(&conn, &created.id, &user.id).unwrap();
        assert_eq!(TaskRepo::assignees(&conn, &created.id).unwrap().len(), 1);
    }

    #[test]
    fn assignees_for_tasks_batches() {
        let conn = setup();
        let list_id = list(&conn);
        let t1 = task(&conn, &list_id, "t1", 0);
        let t2 = task(&conn, &list_id, "t2", 1);
        let user = UserRepo::create(&conn, "u", "h").unwrap();
        TaskRepo::add_assignee(&conn, &t1.id, &user.id).unwrap();

        let map = TaskRepo::assignees_for_tasks(&conn, &[t1.id.as_str(), t2.id.as_str()]).unwrap();
        assert_eq!(map[&t1.id].len(), 1);
        assert!(!map.contains_key(&t2.id));
    }

    #[test]
    fn relocate_moves_across_lists() {
        let conn = setup();
        let board = BoardRepo::create(&conn, "B").unwrap();
        let l1 = ListRepo::create(&conn, &board.id, "L1", 0).unwrap();
        let l2 = ListRepo::create(&conn, &board.id, "L2", 1).unwrap();
        let created = task(&conn, &l1.id, "t", 0);

        TaskRepo::relocate(&conn, &created.id, &l2.id, 0).unwrap();
        let found = TaskRepo::get_by_id(&conn, &created.id).unwrap().unwrap();
        assert_eq!(found.list_id, l2.id);
        assert_eq!(found.position, 0);
    }
}
