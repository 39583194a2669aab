//! Move operations over the ordered containers.
//!
//! Lists order within a board, tasks within a list; positions are
//! zero-based and gap-free. A move runs as remove-then-insert inside one
//! transaction:
//!
//! 1. decrement positions after the vacated slot in the source container
//! 2. increment positions at or after the target slot in the destination,
//!    skipping the moved row itself
//! 3. write the moved row's position (and container on cross-list moves)
//!
//! Between steps the table briefly holds duplicate positions, which is
//! why the schema carries no UNIQUE constraint on `position`; the
//! transaction commits only a contiguous `{0..n-1}` per container.
//!
//! Target positions are validated against `[0, size]`, where size
//! excludes the moved item when it stays in its container. The moved item
//! is the addressed resource (`NotFound` when missing), but the target
//! container arrives as payload, so an unknown container fails as
//! `Validation`.

use mosaic_db::repositories::{ListRepo, TaskRepo};
use mosaic_db::rows::{ListRow, TaskRow};
use rusqlite::Connection;
use tracing::debug;

use crate::errors::{DomainError, Result};
use crate::visibility::{require_list, require_list_target, require_task};

/// Move a list to a new position within its board.
pub fn move_list(
    conn: &Connection,
    user_id: &str,
    list_id: &str,
    new_position: i64,
) -> Result<ListRow> {
    let list = require_list(conn, user_id, list_id)?;

    let size = ListRepo::count_for_board(conn, &list.board_id)? - 1;
    if new_position < 0 || new_position > size {
        return Err(DomainError::validation(format!(
            "position {new_position} out of range for board {}",
            list.board_id
        )));
    }
    if new_position == list.position {
        return Ok(list);
    }

    let tx = conn.unchecked_transaction()?;
    ListRepo::decrement_after(conn, &list.board_id, list.position)?;
    ListRepo::increment_from(conn, &list.board_id, new_position, &list.id)?;
    ListRepo::set_position(conn, &list.id, new_position)?;
    tx.commit()?;

    debug!(list_id = %list.id, from = list.position, to = new_position, "list moved");
    ListRepo::get_by_id(conn, list_id)?.ok_or_else(|| DomainError::list_not_found(list_id))
}

/// Move a task to a new position, optionally into another list.
pub fn move_task(
    conn: &Connection,
    user_id: &str,
    task_id: &str,
    new_position: i64,
    new_list_id: Option<&str>,
) -> Result<TaskRow> {
    let task = require_task(conn, user_id, task_id)?;
    let target = require_list_target(conn, user_id, new_list_id.unwrap_or(&task.list_id))?;
    let same_list = target.id == task.list_id;

    let mut size = TaskRepo::count_for_list(conn, &target.id)?;
    if same_list {
        size -= 1;
    }
    if new_position < 0 || new_position > size {
        return Err(DomainError::validation(format!(
            "position {new_position} out of range for list {}",
            target.id
        )));
    }
    if same_list && new_position == task.position {
        return Ok(task);
    }

    let tx = conn.unchecked_transaction()?;
    TaskRepo::decrement_after(conn, &task.list_id, task.position)?;
    TaskRepo::increment_from(conn, &target.id, new_position, &task.id)?;
    TaskRepo::relocate(conn, &task.id, &target.id, new_position)?;
    tx.commit()?;

    debug!(
        task_id = %task.id,
        from_list = %task.list_id,
        to_list = %target.id,
        from = task.position,
        to = new_position,
        "task moved"
    );
    TaskRepo::get_by_id(conn, task_id)?.ok_or_else(|| DomainError::task_not_found(task_id))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use mosaic_db::migrations::run_migrations;
    use mosaic_db::repositories::{BoardRepo, TaskCreateOptions, UserRepo};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
            .unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn fixture(conn: &Connection) -> (String, String) {
        let user = UserRepo::create(conn, "me", "h").unwrap().id;
        let board = BoardRepo::create(conn, "B").unwrap().id;
        BoardRepo::add_member(conn, &board, &user).unwrap();
        (user, board)
    }

    fn task(conn: &Connection, list_id: &str, title: &str, position: i64) -> String {
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
        .id
    }

    /// Titles of a list's tasks in position order, asserting positions
    /// are exactly 0..n.
    fn order_of(conn: &Connection, list_id: &str) -> Vec<String> {
        let tasks = TaskRepo::for_list(conn, list_id).unwrap();
        for (i, t) in tasks.iter().enumerate() {
            assert_eq!(t.position, i as i64, "gap at {} in list {list_id}", t.title);
        }
        tasks.into_iter().map(|t| t.title).collect()
    }

    #[test]
    fn move_task_within_list_to_front() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        task(&conn, &list, "a", 0);
        task(&conn, &list, "b", 1);
        let c = task(&conn, &list, "c", 2);

        let moved = move_task(&conn, &user, &c, 0, None).unwrap();
        assert_eq!(moved.position, 0);
        assert_eq!(order_of(&conn, &list), vec!["c", "a", "b"]);
    }

    #[test]
    fn move_task_within_list_to_back() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        let a = task(&conn, &list, "a", 0);
        task(&conn, &list, "b", 1);
        task(&conn, &list, "c", 2);

        // With 3 tasks the last valid in-list target is 2.
        let moved = move_task(&conn, &user, &a, 2, None).unwrap();
        assert_eq!(moved.position, 2);
        assert_eq!(order_of(&conn, &list), vec!["b", "c", "a"]);
    }

    #[test]
    fn move_task_across_lists_into_middle() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let src = ListRepo::create(&conn, &board, "Src", 0).unwrap().id;
        let dst = ListRepo::create(&conn, &board, "Dst", 1).unwrap().id;
        let a = task(&conn, &src, "a", 0);
        task(&conn, &src, "b", 1);
        task(&conn, &dst, "x", 0);
        task(&conn, &dst, "y", 1);

        let moved = move_task(&conn, &user, &a, 1, Some(&dst)).unwrap();
        assert_eq!(moved.list_id, dst);
        assert_eq!(order_of(&conn, &src), vec!["b"]);
        assert_eq!(order_of(&conn, &dst), vec!["x", "a", "y"]);
    }

    #[test]
    fn move_task_across_lists_appends_at_size() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let src = ListRepo::create(&conn, &board, "Src", 0).unwrap().id;
        let dst = ListRepo::create(&conn, &board, "Dst", 1).unwrap().id;
        let a = task(&conn, &src, "a", 0);
        task(&conn, &dst, "x", 0);

        // Destination holds 1 task, so position 1 is the append slot.
        let moved = move_task(&conn, &user, &a, 1, Some(&dst)).unwrap();
        assert_eq!(moved.position, 1);
        assert_eq!(order_of(&conn, &dst), vec!["x", "a"]);
    }

    #[test]
    fn out_of_range_position_leaves_everything_untouched() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        let a = task(&conn, &list, "a", 0);
        task(&conn, &list, "b", 1);

        for bad in [-1, 2, 99] {
            assert!(matches!(
                move_task(&conn, &user, &a, bad, None),
                Err(DomainError::Validation(_))
            ));
        }
        assert_eq!(order_of(&conn, &list), vec!["a", "b"]);
    }

    #[test]
    fn unknown_target_list_is_validation_not_not_found() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        let a = task(&conn, &list, "a", 0);

        let err = move_task(&conn, &user, &a, 0, Some("lst_nope")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)), "got {err:?}");
    }

    #[test]
    fn foreign_target_list_is_validation() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        let a = task(&conn, &list, "a", 0);

        let other = UserRepo::create(&conn, "other", "h").unwrap().id;
        let foreign_board = BoardRepo::create(&conn, "FB").unwrap().id;
        BoardRepo::add_member(&conn, &foreign_board, &other).unwrap();
        let foreign_list = ListRepo::create(&conn, &foreign_board, "FL", 0).unwrap().id;

        assert!(matches!(
            move_task(&conn, &user, &a, 0, Some(&foreign_list)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn moving_unknown_task_is_not_found() {
        let conn = setup();
        let (user, _) = fixture(&conn);
        assert!(matches!(
            move_task(&conn, &user, "tsk_nope", 0, None),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn same_position_move_is_a_no_op() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        task(&conn, &list, "a", 0);
        let b = task(&conn, &list, "b", 1);

        let moved = move_task(&conn, &user, &b, 1, None).unwrap();
        assert_eq!(moved.position, 1);
        assert_eq!(order_of(&conn, &list), vec!["a", "b"]);
    }

    #[test]
    fn move_list_within_board() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let a = ListRepo::create(&conn, &board, "A", 0).unwrap().id;
        ListRepo::create(&conn, &board, "B", 1).unwrap();
        ListRepo::create(&conn, &board, "C", 2).unwrap();

        let moved = move_list(&conn, &user, &a, 2).unwrap();
        assert_eq!(moved.position, 2);

        let lists = ListRepo::for_board(&conn, &board).unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        for (i, l) in lists.iter().enumerate() {
            assert_eq!(l.position, i as i64);
        }
    }

    #[test]
    fn move_list_rejects_out_of_range() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let a = ListRepo::create(&conn, &board, "A", 0).unwrap().id;
        ListRepo::create(&conn, &board, "B", 1).unwrap();

        assert!(matches!(
            move_list(&conn, &user, &a, 2),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            move_list(&conn, &user, &a, -1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn move_list_hides_foreign_lists() {
        let conn = setup();
        let (_, board) = fixture(&conn);
        let a = ListRepo::create(&conn, &board, "A", 0).unwrap().id;
        let outsider = UserRepo::create(&conn, "outsider", "h").unwrap().id;

        assert!(matches!(
            move_list(&conn, &outsider, &a, 0),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn repeated_moves_keep_positions_contiguous() {
        let conn = setup();
        let (user, board) = fixture(&conn);
        let list = ListRepo::create(&conn, &board, "L", 0).unwrap().id;
        let ids: Vec<String> = (0..5).map(|i| task(&conn, &list, &format!("t{i}"), i)).collect();

        move_task(&conn, &user, &ids[4], 0, None).unwrap();
        move_task(&conn, &user, &ids[0], 3, None).unwrap();
        move_task(&conn, &user, &ids[2], 4, None).unwrap();

        // order_of asserts contiguity on every read.
        assert_eq!(order_of(&conn, &list).len(), 5);
    }
}
