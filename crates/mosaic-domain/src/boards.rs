//! Board service — CRUD, membership, nested detail view.

use mosaic_db::repositories::{BoardRepo, ListRepo, TaskRepo, UserRepo};
use mosaic_db::rows::{BoardRow, UserRow};
use rusqlite::Connection;
use tracing::info;

use crate::errors::{DomainError, Result};
use crate::lists::{ListDetail, attach_tasks};
use crate::tasks::TaskService;
use crate::visibility::require_board;

/// A board with its members resolved.
#[derive(Debug, Clone)]
pub struct BoardSummary {
    /// The board row.
    pub board: BoardRow,
    /// Members, ordered by username.
    pub members: Vec<UserRow>,
}

/// A board with members and the full list/task tree.
///
/// Assembled from one query per relation (members, lists, tasks,
/// assignees), so the cost does not grow with the number of lists.
#[derive(Debug, Clone)]
pub struct BoardDetail {
    /// The board row.
    pub board: BoardRow,
    /// Members, ordered by username.
    pub members: Vec<UserRow>,
    /// Lists in position order, each with its tasks.
    pub lists: Vec<ListDetail>,
}

/// Board service with business logic and validation.
pub struct BoardService;

impl BoardService {
    /// Create a board with the creator as its first member.
    pub fn create(conn: &Connection, user_id: &str, name: &str) -> Result<BoardSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }

        let tx = conn.unchecked_transaction()?;
        let board = BoardRepo::create(conn, name)?;
        BoardRepo::add_member(conn, &board.id, user_id)?;
        tx.commit()?;

        let members = BoardRepo::members(conn, &board.id)?;
        Ok(BoardSummary { board, members })
    }

    /// Boards the requester is a member of.
    pub fn list(conn: &Connection, user_id: &str) -> Result<Vec<BoardSummary>> {
        let boards = BoardRepo::list_for_user(conn, user_id)?;
        let ids: Vec<&str> = boards.iter().map(|b| b.id.as_str()).collect();
        let mut members = BoardRepo::members_for_boards(conn, &ids)?;

        Ok(boards
            .into_iter()
            .map(|board| {
                let members = members.remove(&board.id).unwrap_or_default();
                BoardSummary { board, members }
            })
            .collect())
    }

    /// One board with the full nested tree.
    pub fn get(conn: &Connection, user_id: &str, board_id: &str) -> Result<BoardDetail> {
        let board = require_board(conn, user_id, board_id)?;
        let members = BoardRepo::members(conn, &board.id)?;
        let lists = ListRepo::for_board(conn, &board.id)?;
        let tasks = TaskService::details(conn, TaskRepo::for_board(conn, &board.id)?)?;

        Ok(BoardDetail {
            board,
            members,
            lists: attach_tasks(lists, tasks),
        })
    }

    /// Rename a board.
    pub fn rename(
        conn: &Connection,
        user_id: &str,
        board_id: &str,
        name: &str,
    ) -> Result<BoardSummary> {
        let board = require_board(conn, user_id, board_id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        let _ = BoardRepo::rename(conn, &board.id, name)?;

        let members = BoardRepo::members(conn, &board.id)?;
        let board = BoardRepo::get_by_id(conn, board_id)?
            .ok_or_else(|| DomainError::board_not_found(board_id))?;
        Ok(BoardSummary { board, members })
    }

    /// Delete a board. Lists and tasks cascade; journal entries survive
    /// detached from their tasks.
    pub fn delete(conn: &Connection, user_id: &str, board_id: &str) -> Result<()> {
        let board = require_board(conn, user_id, board_id)?;
        let _ = BoardRepo::delete(conn, &board.id)?;
        Ok(())
    }

    /// Add a user to a board by username. Unknown usernames are
    /// `NotFound`; adding an existing member succeeds without change.
    pub fn add_member(
        conn: &Connection,
        user_id: &str,
        board_id: &str,
        username: &str,
    ) -> Result<BoardSummary> {
        let board = require_board(conn, user_id, board_id)?;
        let user = UserRepo::get_by_username(conn, username)?
            .ok_or_else(|| DomainError::user_not_found(username))?;

        BoardRepo::add_member(conn, &board.id, &user.id)?;
        info!(board_id = %board.id, user_id = %user.id, "board member added");

        let members = BoardRepo::members(conn, &board.id)?;
        Ok(BoardSummary { board, members })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
