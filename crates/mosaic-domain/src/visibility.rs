//! Access checks shared across the services.
//!
//! Everything a user can reach flows from board membership: lists and
//! tasks are reachable when the user belongs to the owning board, and a
//! journal entry is readable when the user authored it or the entry is
//! shared through a task on a common board (that predicate lives in the
//! repository layer, inside the SQL).
//!
//! Read-path failures return `NotFound` rather than a Forbidden-style
//! error, so an outsider cannot distinguish "absent" from "hidden".

use mosaic_db::repositories::{BoardRepo, ListRepo, TaskRepo};
use mosaic_db::rows::{BoardRow, ListRow, TaskRow};
use rusqlite::Connection;

use crate::errors::{DomainError, Result};

/// Fetch a board the user is a member of, or `NotFound`.
pub fn require_board(conn: &Connection, user_id: &str, board_id: &str) -> Result<BoardRow> {
    let board = BoardRepo::get_by_id(conn, board_id)?
        .ok_or_else(|| DomainError::board_not_found(board_id))?;
    if !BoardRepo::is_member(conn, board_id, user_id)? {
        return Err(DomainError::board_not_found(board_id));
    }
    Ok(board)
}

/// Fetch a list on one of the user's boards, or `NotFound`.
pub fn require_list(conn: &Connection, user_id: &str, list_id: &str) -> Result<ListRow> {
    let list = ListRepo::get_by_id(conn, list_id)?
        .ok_or_else(|| DomainError::list_not_found(list_id))?;
    if !BoardRepo::is_member(conn, &list.board_id, user_id)? {
        return Err(DomainError::list_not_found(list_id));
    }
    Ok(list)
}

/// Fetch a task on one of the user's boards, or `NotFound`.
pub fn require_task(conn: &Connection, user_id: &str, task_id: &str) -> Result<TaskRow> {
    let task = TaskRepo::get_by_id(conn, task_id)?
        .ok_or_else(|| DomainError::task_not_found(task_id))?;
    let list = ListRepo::get_by_id(conn, &task.list_id)?
        .ok_or_else(|| DomainError::task_not_found(task_id))?;
    if !BoardRepo::is_member(conn, &list.board_id, user_id)? {
        return Err(DomainError::task_not_found(task_id));
    }
    Ok(task)
}

/// Fetch a list for use as a reference target (task create, cross-list
/// move). Unlike [`require_list`], a missing or inaccessible list is a
/// `Validation` failure: the list is payload data here, not the addressed
/// resource.
pub fn require_list_target(conn: &Connection, user_id: &str, list_id: &str) -> Result<ListRow> {
    let Some(list) = ListRepo::get_by_id(conn, list_id)? else {
        return Err(DomainError::validation(format!(
            "list {list_id} does not exist"
        )));
    };
    if !BoardRepo::is_member(conn, &list.board_id, user_id)? {
        return Err(DomainError::validation(format!(
            "list {list_id} does not exist"
        )));
    }
    Ok(list)
}

/// Fetch a board for use as a reference target (list create). Missing or
/// inaccessible boards fail as `Validation`, same as list targets.
pub fn require_board_target(conn: &Connection, user_id: &str, board_id: &str) -> Result<BoardRow> {
    let Some(board) = BoardRepo::get_by_id(conn, board_id)? else {
        return Err(DomainError::validation(format!(
            "board {board_id} does not exist"
        )));
    };
    if !BoardRepo::is_member(conn, board_id, user_id)? {
        return Err(DomainError::validation(format!(
            "board {board_id} does not exist"
        )));
    }
    Ok(board)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
