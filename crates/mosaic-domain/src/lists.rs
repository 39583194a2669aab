//! List service — CRUD and scoped listing, with nested tasks.

use std::collections::HashMap;

use mosaic_db::repositories::{BoardRepo, ListRepo, TaskRepo};
use mosaic_db::rows::ListRow;
use rusqlite::Connection;

use crate::errors::{DomainError, Result};
use crate::tasks::{TaskDetail, TaskService};
use crate::visibility::{require_board_target, require_list};

/// A list with its tasks resolved, ascending by position.
#[derive(Debug, Clone)]
pub struct ListDetail {
    /// The list row.
    pub list: ListRow,
    /// Tasks in position order, each with assignees.
    pub tasks: Vec<TaskDetail>,
}

/// List service with business logic and validation.
pub struct ListService;

impl ListService {
    /// Create a list at the end of its board.
    pub fn create(
        conn: &Connection,
        user_id: &str,
        board_id: &str,
        name: &str,
    ) -> Result<ListDetail> {
        let board = require_board_target(conn, user_id, board_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }

        let position = ListRepo::count_for_board(conn, &board.id)?;
        let list = ListRepo::create(conn, &board.id, name, position)?;
        Ok(ListDetail {
            list,
            tasks: Vec::new(),
        })
    }

    /// Lists visible to the requester, optionally narrowed to one board.
    ///
    /// A foreign or unknown `board_id` filter yields an empty result
    /// rather than an error, matching how membership scoping composes
    /// with filters.
    pub fn list(
        conn: &Connection,
        user_id: &str,
        board_id: Option<&str>,
    ) -> Result<Vec<ListDetail>> {
        let (lists, tasks) = match board_id {
            Some(board_id) => {
                if !BoardRepo::is_member(conn, board_id, user_id)? {
                    return Ok(Vec::new());
                }
                (
                    ListRepo::for_board(conn, board_id)?,
                    TaskRepo::for_board(conn, board_id)?,
                )
            }
            None => (
                ListRepo::for_user(conn, user_id)?,
                TaskRepo::for_user(conn, user_id)?,
            ),
        };
        let details = TaskService::details(conn, tasks)?;
        Ok(attach_tasks(lists, details))
    }

    /// One list with its tasks, scoped to the requester's boards.
    pub fn get(conn: &Connection, user_id: &str, list_id: &str) -> Result<ListDetail> {
        let list = require_list(conn, user_id, list_id)?;
        let tasks = TaskService::details(conn, TaskRepo::for_list(conn, &list.id)?)?;
        Ok(ListDetail { list, tasks })
    }

    /// Rename a list.
    pub fn rename(
        conn: &Connection,
        user_id: &str,
        list_id: &str,
        name: &str,
    ) -> Result<ListDetail> {
        let list = require_list(conn, user_id, list_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        let _ = ListRepo::rename(conn, &list.id, name)?;
        Self::get(conn, user_id, list_id)
    }

    /// Delete a list (tasks cascade) and close the position gap it leaves
    /// on the board.
    pub fn delete(conn: &Connection, user_id: &str, list_id: &str) -> Result<()> {
        let list = require_list(conn, user_id, list_id)?;

        let tx = conn.unchecked_transaction()?;
        let _ = ListRepo::delete(conn, &list.id)?;
        ListRepo::decrement_after(conn, &list.board_id, list.position)?;
        tx.commit()?;
        Ok(())
    }
}

/// Group task details under their lists, preserving both orders.
pub(crate) fn attach_tasks(lists: Vec<ListRow>, tasks: Vec<TaskDetail>) -> Vec<ListDetail> {
    let mut by_list: HashMap<String, Vec<TaskDetail>> = HashMap::new();
    for task in tasks {
        by_list
            .entry(task.task.list_id.clone())
            .or_default()
            .push(task);
    }
    lists
        .into_iter()
        .map(|list| {
            let tasks = by_list.remove(&list.id).unwrap_or_default();
            ListDetail { list, tasks }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
