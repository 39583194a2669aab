//! Task service — CRUD, assignee management, scoped listing.
//!
//! Position maintenance on delete keeps each list gap-free; moves live in
//! [`crate::ordering`].

use mosaic_core::model::{SCALE_MAX, SCALE_MIN, scale_in_range};
use mosaic_core::time::{parse_iso, to_iso};
use mosaic_db::repositories::{TaskCreateOptions, TaskRepo, TaskUpdateOptions, UserRepo};
use mosaic_db::rows::{TaskRow, UserRow};
use rusqlite::Connection;

use crate::errors::{DomainError, Result};
use crate::visibility::{require_list_target, require_task};

/// A task with its assignees resolved.
#[derive(Debug, Clone)]
pub struct TaskDetail {
    /// The task row.
    pub task: TaskRow,
    /// Assignees, ordered by username.
    pub assignees: Vec<UserRow>,
}

/// Parameters for creating a task.
#[derive(Debug, Clone)]
pub struct TaskCreate {
    /// Owning list; must be on one of the requester's boards.
    pub list_id: String,
    /// Task title, non-empty.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional due date, RFC 3339.
    pub due_date: Option<String>,
    /// Priority 1..=3; absent means 2.
    pub priority: Option<i64>,
    /// Complexity 1..=3; absent means 2.
    pub complexity: Option<i64>,
    /// Initial assignee set; every ID must exist.
    pub assigned_to_ids: Option<Vec<String>>,
}

/// Parameters for partially updating a task. `None` leaves a field
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title, non-empty.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<String>>,
    /// New priority.
    pub priority: Option<i64>,
    /// New complexity.
    pub complexity: Option<i64>,
    /// Replacement assignee set; every ID must exist.
    pub assigned_to_ids: Option<Vec<String>>,
}

/// Middle of the 1..=3 scale, used when a create omits priority or
/// complexity.
const SCALE_DEFAULT: i64 = 2;

/// Task service with business logic and validation.
pub struct TaskService;

impl TaskService {
    /// Create a task at the end of its list.
    pub fn create(conn: &Connection, user_id: &str, params: &TaskCreate) -> Result<TaskDetail> {
        let list = require_list_target(conn, user_id, &params.list_id)?;

        let title = params.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        let priority = check_scale("priority", params.priority)?;
        let complexity = check_scale("complexity", params.complexity)?;
        let due_date = params.due_date.as_deref().map(normalize_due_date).transpose()?;
        if let Some(ids) = &params.assigned_to_ids {
            check_assignees(conn, ids)?;
        }

        let tx = conn.unchecked_transaction()?;
        let task = TaskRepo::create(
            conn,
            &TaskCreateOptions {
                list_id: &list.id,
                title,
                description: &params.description,
                due_date: due_date.as_deref(),
                priority,
                complexity,
                position: TaskRepo::count_for_list(conn, &list.id)?,
            },
        )?;
        if let Some(ids) = &params.assigned_to_ids {
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            TaskRepo::set_assignees(conn, &task.id, &refs)?;
        }
        tx.commit()?;

        Self::detail(conn, task)
    }

    /// Every task on the requester's boards.
    pub fn list(conn: &Connection, user_id: &str) -> Result<Vec<TaskDetail>> {
        let tasks = TaskRepo::for_user(conn, user_id)?;
        Self::details(conn, tasks)
    }

    /// One task, scoped to the requester's boards.
    pub fn get(conn: &Connection, user_id: &str, task_id: &str) -> Result<TaskDetail> {
        let task = require_task(conn, user_id, task_id)?;
        Self::detail(conn, task)
    }

    /// Partially update a task.
    pub fn update(
        conn: &Connection,
        user_id: &str,
        task_id: &str,
        params: &TaskUpdate,
    ) -> Result<TaskDetail> {
        let task = require_task(conn, user_id, task_id)?;

        if let Some(title) = &params.title {
            if title.trim().is_empty() {
                return Err(DomainError::validation("title must not be empty"));
            }
        }
        if let Some(priority) = params.priority {
            let _ = check_scale("priority", Some(priority))?;
        }
        if let Some(complexity) = params.complexity {
            let _ = check_scale("complexity", Some(complexity))?;
        }
        let due_date = match &params.due_date {
            Some(Some(raw)) => Some(Some(normalize_due_date(raw)?)),
            Some(None) => Some(None),
            None => None,
        };
        if let Some(ids) = &params.assigned_to_ids {
            check_assignees(conn, ids)?;
        }

        let tx = conn.unchecked_transaction()?;
        let _ = TaskRepo::update(
            conn,
            &task.id,
            &TaskUpdateOptions {
                title: params.title.as_deref().map(str::trim),
                description: params.description.as_deref(),
                due_date: due_date.as_ref().map(|d| d.as_deref()),
                priority: params.priority,
                complexity: params.complexity,
            },
        )?;
        if let Some(ids) = &params.assigned_to_ids {
            let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
            TaskRepo::set_assignees(conn, &task.id, &refs)?;
        }
        tx.commit()?;

        let updated = require_task(conn, user_id, task_id)?;
        Self::detail(conn, updated)
    }

    /// Delete a task and close the position gap it leaves.
    pub fn delete(conn: &Connection, user_id: &str, task_id: &str) -> Result<()> {
        let task = require_task(conn, user_id, task_id)?;

        let tx = conn.unchecked_transaction()?;
        let _ = TaskRepo::delete(conn, &task.id)?;
        TaskRepo::decrement_after(conn, &task.list_id, task.position)?;
        tx.commit()?;
        Ok(())
    }

    /// Add the requester to the task's assignee set. Idempotent.
    pub fn assign_self(conn: &Connection, user_id: &str, task_id: &str) -> Result<TaskDetail> {
        let task = require_task(conn, user_id, task_id)?;
        TaskRepo::add_assignee(conn, &task.id, user_id)?;
        Self::detail(conn, task)
    }

    /// Resolve assignees for one task.
    pub(crate) fn detail(conn: &Connection, task: TaskRow) -> Result<TaskDetail> {
        let assignees = TaskRepo::assignees(conn, &task.id)?;
        Ok(TaskDetail { task, assignees })
    }

    /// Resolve assignees for many tasks with one batched query.
    pub(crate) fn details(conn: &Connection, tasks: Vec<TaskRow>) -> Result<Vec<TaskDetail>> {
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let mut by_task = TaskRepo::assignees_for_tasks(conn, &ids)?;
        Ok(tasks
            .into_iter()
            .map(|task| {
                let assignees = by_task.remove(&task.id).unwrap_or_default();
                TaskDetail { task, assignees }
            })
            .collect())
    }
}

fn check_scale(field: &str, value: Option<i64>) -> Result<i64> {
    let value = value.unwrap_or(SCALE_DEFAULT);
    if !scale_in_range(value) {
        return Err(DomainError::validation(format!(
            "{field} must be between {SCALE_MIN} and {SCALE_MAX}"
        )));
    }
    Ok(value)
}

/// Parse a due date and re-serialize it in the canonical stored form.
fn normalize_due_date(raw: &str) -> Result<String> {
    let parsed = parse_iso(raw)
        .ok_or_else(|| DomainError::validation(format!("invalid due_date: {raw}")))?;
    Ok(to_iso(parsed))
}

fn check_assignees(conn: &Connection, ids: &[String]) -> Result<()> {
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    if !UserRepo::all_exist(conn, &refs)? {
        return Err(DomainError::validation("assigned_to_ids contains an unknown user"));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use mosaic_db::migrations::run_migrations;
    use mosaic_db::repositories::{BoardRepo, ListRepo};

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
        let list = ListRepo::create(conn, &board, "L", 0).unwrap().id;
        (user, list)
    }

    fn create_params(list_id: &str, title: &str) -> TaskCreate {
        TaskCreate {
            list_id: list_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            due_date: None,
            priority: Some(2),
            complexity: Some(2),
            assigned_to_ids: None,
        }
    }

    #[test]
    fn create_appends_at_end_of_list() {
        let conn = setup();
        let (user, list) = fixture(&conn);

        let a = TaskService::create(&conn, &user, &create_params(&list, "a")).unwrap();
        let b = TaskService::create(&conn, &user, &create_params(&list, "b")).unwrap();
        assert_eq!(a.task.position, 0);
        assert_eq!(b.task.position, 1);
    }

    #[test]
    fn create_with_assignees_and_due_date() {
        let conn = setup();
        let (user, list) = fixture(&conn);

        let mut params = create_params(&list, "t");
        params.due_date = Some("2026-09-01T12:00:00+02:00".to_string());
        params.assigned_to_ids = Some(vec![user.clone()]);

        let detail = TaskService::create(&conn, &user, &params).unwrap();
        // Offset input is normalized to UTC.
        assert_eq!(detail.task.due_date.as_deref(), Some("2026-09-01T10:00:00Z"));
        assert_eq!(detail.assignees.len(), 1);
        assert_eq!(detail.assignees[0].id, user);
    }

    #[test]
    fn create_rejects_bad_payloads() {
        let conn = setup();
        let (user, list) = fixture(&conn);

        let cases = [
            {
                let mut p = create_params(&list, "  ");
                p.title = "  ".to_string();
                p
            },
            {
                let mut p = create_params(&list, "t");
                p.priority = Some(5);
                p
            },
            {
                let mut p = create_params(&list, "t");
                p.complexity = Some(0);
                p
            },
            {
                let mut p = create_params(&list, "t");
                p.due_date = Some("invalid-date".to_string());
                p
            },
            {
                let mut p = create_params(&list, "t");
                p.assigned_to_ids = Some(vec!["usr_ghost".to_string()]);
                p
            },
            create_params("lst_nope", "t"),
        ];
        for params in &cases {
            assert!(
                matches!(
                    TaskService::create(&conn, &user, params),
                    Err(DomainError::Validation(_))
                ),
                "expected validation failure for {params:?}"
            );
        }
    }

    #[test]
    fn create_defaults_scales_to_two() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let mut params = create_params(&list, "t");
        params.priority = None;
        params.complexity = None;

        let detail = TaskService::create(&conn, &user, &params).unwrap();
        assert_eq!(detail.task.priority, 2);
        assert_eq!(detail.task.complexity, 2);
    }

    #[test]
    fn create_on_foreign_list_is_validation() {
        let conn = setup();
        let (_, list) = fixture(&conn);
        let outsider = UserRepo::create(&conn, "outsider", "h").unwrap().id;

        assert!(matches!(
            TaskService::create(&conn, &outsider, &create_params(&list, "t")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let created = TaskService::create(&conn, &user, &create_params(&list, "old")).unwrap();

        let updated = TaskService::update(
            &conn,
            &user,
            &created.task.id,
            &TaskUpdate {
                title: Some("new".to_string()),
                priority: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.task.title, "new");
        assert_eq!(updated.task.priority, 3);
        assert_eq!(updated.task.complexity, 2);
    }

    #[test]
    fn update_replaces_assignee_set() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let other = UserRepo::create(&conn, "other", "h").unwrap().id;
        let mut params = create_params(&list, "t");
        params.assigned_to_ids = Some(vec![user.clone()]);
        let created = TaskService::create(&conn, &user, &params).unwrap();

        let updated = TaskService::update(
            &conn,
            &user,
            &created.task.id,
            &TaskUpdate {
                assigned_to_ids: Some(vec![other.clone()]),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.assignees.len(), 1);
        assert_eq!(updated.assignees[0].id, other);
    }

    #[test]
    fn update_rejects_unknown_assignee() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let created = TaskService::create(&conn, &user, &create_params(&list, "t")).unwrap();

        assert!(matches!(
            TaskService::update(
                &conn,
                &user,
                &created.task.id,
                &TaskUpdate {
                    assigned_to_ids: Some(vec!["usr_ghost".to_string()]),
                    ..Default::default()
                },
            ),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_unknown_task_is_not_found() {
        let conn = setup();
        let (user, _) = fixture(&conn);
        assert!(matches!(
            TaskService::update(&conn, &user, "tsk_nope", &TaskUpdate::default()),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_renumbers_remaining_tasks() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let a = TaskService::create(&conn, &user, &create_params(&list, "a")).unwrap();
        let b = TaskService::create(&conn, &user, &create_params(&list, "b")).unwrap();
        let c = TaskService::create(&conn, &user, &create_params(&list, "c")).unwrap();

        TaskService::delete(&conn, &user, &b.task.id).unwrap();

        let remaining = TaskRepo::for_list(&conn, &list).unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!((remaining[0].id.as_str(), remaining[0].position), (a.task.id.as_str(), 0));
        assert_eq!((remaining[1].id.as_str(), remaining[1].position), (c.task.id.as_str(), 1));
    }

    #[test]
    fn assign_self_is_idempotent() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let created = TaskService::create(&conn, &user, &create_params(&list, "t")).unwrap();

        let first = TaskService::assign_self(&conn, &user, &created.task.id).unwrap();
        let second = TaskService::assign_self(&conn, &user, &created.task.id).unwrap();
        assert_eq!(first.assignees.len(), 1);
        assert_eq!(second.assignees.len(), 1);
    }

    #[test]
    fn list_is_scoped_to_membership() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        TaskService::create(&conn, &user, &create_params(&list, "mine")).unwrap();

        let stranger = UserRepo::create(&conn, "stranger", "h").unwrap().id;
        assert_eq!(TaskService::list(&conn, &user).unwrap().len(), 1);
        assert!(TaskService::list(&conn, &stranger).unwrap().is_empty());
    }

    #[test]
    fn get_scopes_to_membership() {
        let conn = setup();
        let (user, list) = fixture(&conn);
        let created = TaskService::create(&conn, &user, &create_params(&list, "t")).unwrap();
        let stranger = UserRepo::create(&conn, "stranger", "h").unwrap().id;

        assert!(TaskService::get(&conn, &user, &created.task.id).is_ok());
        assert!(matches!(
            TaskService::get(&conn, &stranger, &created.task.id),
            Err(DomainError::NotFound { .. })
        ));
    }
}
