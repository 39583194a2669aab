//! Journal entry workflows.
//!
//! Entries are private by default and always editable by their author
//! alone. A `shared` entry becomes readable to other users only through a
//! task reference: members of the referenced task's board may read it.
//! Every read path in this module goes through the visibility filter, and
//! non-author writes report the entry as missing rather than revealing
//! that it exists.

use mosaic_core::{Visibility, mood_in_range};
use mosaic_db::repositories::{EntryCreateOptions, EntryRepo, EntryUpdateOptions, UserRepo};
use mosaic_db::rows::{EntryRow, UserRow};
use rusqlite::Connection;
use tracing::info;

use crate::errors::{DomainError, Result};
use crate::tasks::{TaskDetail, TaskService};

/// A journal entry with its author resolved.
#[derive(Clone, Debug)]
pub struct EntryDetail {
    /// The entry row.
    pub entry: EntryRow,
    /// The entry's author.
    pub author: UserRow,
}

/// Parameters for creating a journal entry.
///
/// `valence` and `arousal` are optional here so that an absent field can
/// fail with a field-specific message instead of a deserialization error.
#[derive(Clone, Debug)]
pub struct EntryCreate {
    /// Optional task reference; must be on one of the author's boards.
    pub task_id: Option<String>,
    /// Entry title, non-empty.
    pub title: String,
    /// Entry body, non-empty.
    pub content: String,
    /// Mood valence in [-1, 1]; required.
    pub valence: Option<f64>,
    /// Mood arousal in [-1, 1]; required.
    pub arousal: Option<f64>,
    /// `private` or `shared`; absent means private.
    pub visibility: Option<String>,
}

/// Partial update; absent fields keep their current value.
///
/// `task_id` distinguishes "leave alone" (`None`) from "detach"
/// (`Some(None)`) from "reference this task" (`Some(Some(id))`).
#[derive(Clone, Debug, Default)]
pub struct EntryUpdate {
    /// New title, non-empty.
    pub title: Option<String>,
    /// New body, non-empty.
    pub content: Option<String>,
    /// New valence.
    pub valence: Option<f64>,
    /// New arousal.
    pub arousal: Option<f64>,
    /// New visibility.
    pub visibility: Option<String>,
    /// `Some(None)` detaches the task, `Some(Some(_))` re-links.
    pub task_id: Option<Option<String>>,
}

/// Filters for the entry listing.
#[derive(Clone, Debug, Default)]
pub struct EntryFilter {
    /// Keep only entries referencing this task.
    pub task_id: Option<String>,
    /// Keep only entries with this visibility.
    pub visibility: Option<String>,
}

/// Journal entry operations, all scoped to the acting user.
pub struct JournalService;

impl JournalService {
    /// Create an entry authored by `user_id`.
    pub fn create(conn: &Connection, user_id: &str, body: &EntryCreate) -> Result<EntryDetail> {
        let title = body.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        if body.content.is_empty() {
            return Err(DomainError::validation("content must not be empty"));
        }
        let valence = check_mood("valence", body.valence)?;
        let arousal = check_mood("arousal", body.arousal)?;
        let visibility = match &body.visibility {
            Some(raw) => check_visibility(raw)?,
            None => Visibility::Private,
        };
        if let Some(task_id) = &body.task_id {
            check_task_reference(conn, user_id, task_id)?;
        }

        let entry = EntryRepo::create(
            conn,
            &EntryCreateOptions {
                author_id: user_id,
                task_id: body.task_id.as_deref(),
                title,
                content: &body.content,
                valence,
                arousal,
                visibility: visibility.as_sql(),
            },
        )?;
        info!(entry_id = %entry.id, author_id = %user_id, "journal entry created");
        Self::detail(conn, entry)
    }

    /// Entries visible to `user_id`, newest first, with optional filters.
    pub fn list(
        conn: &Connection,
        user_id: &str,
        filter: &EntryFilter,
    ) -> Result<Vec<EntryDetail>> {
        let visibility = match &filter.visibility {
            Some(raw) => Some(check_visibility(raw)?),
            None => None,
        };
        let rows = EntryRepo::visible_to(
            conn,
            user_id,
            filter.task_id.as_deref(),
            visibility.map(Visibility::as_sql),
        )?;
        Self::details(conn, rows)
    }

    /// A single entry, or `NotFound` when it is absent or hidden.
    pub fn get(conn: &Connection, user_id: &str, entry_id: &str) -> Result<EntryDetail> {
        let entry = EntryRepo::get_visible(conn, user_id, entry_id)?
            .ok_or_else(|| DomainError::entry_not_found(entry_id))?;
        Self::detail(conn, entry)
    }

    /// Update an entry; only its author may, and anyone else sees `NotFound`.
    pub fn update(
        conn: &Connection,
        user_id: &str,
        entry_id: &str,
        body: &EntryUpdate,
    ) -> Result<EntryDetail> {
        let _ = Self::require_authored(conn, user_id, entry_id)?;

        let title = match &body.title {
            Some(raw) => {
                let title = raw.trim();
                if title.is_empty() {
                    return Err(DomainError::validation("title must not be empty"));
                }
                Some(title)
            }
            None => None,
        };
        if body.content.as_deref() == Some("") {
            return Err(DomainError::validation("content must not be empty"));
        }
        for (field, value) in [("valence", body.valence), ("arousal", body.arousal)] {
            if let Some(value) = value {
                if !mood_in_range(value) {
                    return Err(mood_error(field));
                }
            }
        }
        let visibility = match &body.visibility {
            Some(raw) => Some(check_visibility(raw)?),
            None => None,
        };
        if let Some(Some(task_id)) = &body.task_id {
            check_task_reference(conn, user_id, task_id)?;
        }

        let _ = EntryRepo::update(
            conn,
            entry_id,
            &EntryUpdateOptions {
                title,
                content: body.content.as_deref(),
                valence: body.valence,
                arousal: body.arousal,
                visibility: visibility.map(Visibility::as_sql),
                task_id: body.task_id.as_ref().map(Option::as_deref),
            },
        )?;
        Self::get(conn, user_id, entry_id)
    }

    /// Delete an entry; only its author may, and anyone else sees `NotFound`.
    pub fn delete(conn: &Connection, user_id: &str, entry_id: &str) -> Result<()> {
        let _ = Self::require_authored(conn, user_id, entry_id)?;
        let _ = EntryRepo::delete(conn, entry_id)?;
        info!(entry_id = %entry_id, "journal entry deleted");
        Ok(())
    }

    /// Tasks the user may reference from an entry, with assignees.
    pub fn available_tasks(conn: &Connection, user_id: &str) -> Result<Vec<TaskDetail>> {
        TaskService::list(conn, user_id)
    }

    fn require_authored(conn: &Connection, user_id: &str, entry_id: &str) -> Result<EntryRow> {
        let entry = EntryRepo::get_by_id(conn, entry_id)?
            .ok_or_else(|| DomainError::entry_not_found(entry_id))?;
        if entry.author_id != user_id {
            // Non-authors get the same answer as for a missing entry.
            return Err(DomainError::entry_not_found(entry_id));
        }
        Ok(entry)
    }

    fn detail(conn: &Connection, entry: EntryRow) -> Result<EntryDetail> {
        let author = UserRepo::get_by_id(conn, &entry.author_id)?
            .ok_or_else(|| DomainError::user_not_found(&entry.author_id))?;
        Ok(EntryDetail { entry, author })
    }

    fn details(conn: &Connection, rows: Vec<EntryRow>) -> Result<Vec<EntryDetail>> {
        let author_ids: Vec<&str> = rows.iter().map(|r| r.author_id.as_str()).collect();
        // One author can own several entries, so clone instead of remove.
        let authors = UserRepo::get_by_ids(conn, &author_ids)?;
        rows.into_iter()
            .map(|entry| {
                let author = authors
                    .get(&entry.author_id)
                    .cloned()
                    .ok_or_else(|| DomainError::user_not_found(&entry.author_id))?;
                Ok(EntryDetail { entry, author })
            })
            .collect()
    }
}

fn check_mood(field: &'static str, value: Option<f64>) -> Result<f64> {
    let value = value.ok_or_else(|| DomainError::validation(format!("{field} is required")))?;
    if !mood_in_range(value) {
        return Err(mood_error(field));
    }
    Ok(value)
}

fn mood_error(field: &str) -> DomainError {
    DomainError::validation(format!("{field} must be between -1 and 1"))
}

fn check_visibility(raw: &str) -> Result<Visibility> {
    Visibility::parse(raw)
        .ok_or_else(|| DomainError::validation("visibility must be 'private' or 'shared'"))
}

/// A task referenced from an entry must exist and sit on one of the
/// author's boards. Both failures use the same message.
fn check_task_reference(conn: &Connection, user_id: &str, task_id: &str) -> Result<()> {
    if !EntryRepo::viewer_shares_task_board(conn, user_id, task_id)? {
        return Err(DomainError::validation(format!(
            "task {task_id} does not exist"
        )));
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
    use mosaic_db::repositories::{BoardRepo, ListRepo, TaskCreateOptions, TaskRepo};

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")
            .unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn user(conn: &Connection, name: &str) -> String {
        UserRepo::create(conn, name, "h").unwrap().id
    }

    /// Board with the given members plus one task; returns the task id.
    fn board_task(conn: &Connection, members: &[&str]) -> String {
        let board = BoardRepo::create(conn, "B").unwrap().id;
        for m in members {
            BoardRepo::add_member(conn, &board, m).unwrap();
        }
        let list = ListRepo::create(conn, &board, "L", 0).unwrap().id;
        TaskRepo::create(
            conn,
            &TaskCreateOptions {
                list_id: &list,
                title: "t",
                description: "",
                due_date: None,
                priority: 2,
                complexity: 2,
                position: 0,
            },
        )
        .unwrap()
        .id
    }

    fn body(task_id: Option<&str>, visibility: &str) -> EntryCreate {
        EntryCreate {
            task_id: task_id.map(str::to_string),
            title: "Morning".to_string(),
            content: "Slept well".to_string(),
            valence: Some(0.4),
            arousal: Some(-0.2),
            visibility: Some(visibility.to_string()),
        }
    }

    #[test]
    fn create_roundtrip() {
        let conn = setup();
        let me = user(&conn, "me");

        let detail = JournalService::create(&conn, &me, &body(None, "private")).unwrap();
        assert_eq!(detail.entry.title, "Morning");
        assert_eq!(detail.entry.visibility, "private");
        assert_eq!(detail.author.username, "me");
        assert!(detail.entry.task_id.is_none());
    }

    #[test]
    fn create_defaults_to_private() {
        let conn = setup();
        let me = user(&conn, "me");
        let mut b = body(None, "shared");
        b.visibility = None;

        let detail = JournalService::create(&conn, &me, &b).unwrap();
        assert_eq!(detail.entry.visibility, "private");
    }

    #[test]
    fn create_requires_both_mood_fields() {
        let conn = setup();
        let me = user(&conn, "me");

        let mut b = body(None, "private");
        b.arousal = None;
        let err = JournalService::create(&conn, &me, &b).unwrap_err();
        assert!(matches!(&err, DomainError::Validation(m) if m.contains("arousal")));

        let mut b = body(None, "private");
        b.valence = None;
        assert!(matches!(
            JournalService::create(&conn, &me, &b),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_bad_payloads() {
        let conn = setup();
        let me = user(&conn, "me");

        let cases: Vec<EntryCreate> = vec![
            EntryCreate { title: "  ".to_string(), ..body(None, "private") },
            EntryCreate { content: String::new(), ..body(None, "private") },
            EntryCreate { valence: Some(1.5), ..body(None, "private") },
            EntryCreate { arousal: Some(f64::NAN), ..body(None, "private") },
            body(None, "public"),
            body(Some("tsk_nope"), "private"),
        ];
        for case in cases {
            assert!(
                matches!(
                    JournalService::create(&conn, &me, &case),
                    Err(DomainError::Validation(_))
                ),
                "accepted {case:?}"
            );
        }
    }

    #[test]
    fn create_rejects_tasks_on_foreign_boards() {
        let conn = setup();
        let me = user(&conn, "me");
        let other = user(&conn, "other");
        let foreign_task = board_task(&conn, &[&other]);

        let err = JournalService::create(&conn, &me, &body(Some(&foreign_task), "shared"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn shared_entries_travel_through_board_membership() {
        let conn = setup();
        let me = user(&conn, "me");
        let teammate = user(&conn, "teammate");
        let stranger = user(&conn, "stranger");
        let task = board_task(&conn, &[&me, &teammate]);

        let shared = JournalService::create(&conn, &me, &body(Some(&task), "shared")).unwrap();
        let private = JournalService::create(&conn, &me, &body(Some(&task), "private")).unwrap();

        assert!(JournalService::get(&conn, &teammate, &shared.entry.id).is_ok());
        assert!(matches!(
            JournalService::get(&conn, &teammate, &private.entry.id),
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            JournalService::get(&conn, &stranger, &shared.entry.id),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn list_applies_filters() {
        let conn = setup();
        let me = user(&conn, "me");
        let task = board_task(&conn, &[&me]);

        JournalService::create(&conn, &me, &body(Some(&task), "shared")).unwrap();
        JournalService::create(&conn, &me, &body(None, "private")).unwrap();

        let all = JournalService::list(&conn, &me, &EntryFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let on_task = JournalService::list(
            &conn,
            &me,
            &EntryFilter { task_id: Some(task.clone()), visibility: None },
        )
        .unwrap();
        assert_eq!(on_task.len(), 1);
        assert_eq!(on_task[0].entry.task_id.as_deref(), Some(task.as_str()));

        let private_only = JournalService::list(
            &conn,
            &me,
            &EntryFilter { task_id: None, visibility: Some("private".to_string()) },
        )
        .unwrap();
        assert_eq!(private_only.len(), 1);
        assert_eq!(private_only[0].entry.visibility, "private");
    }

    #[test]
    fn list_rejects_unknown_visibility_filter() {
        let conn = setup();
        let me = user(&conn, "me");
        let filter = EntryFilter { task_id: None, visibility: Some("everyone".to_string()) };

        assert!(matches!(
            JournalService::list(&conn, &me, &filter),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_is_author_only() {
        let conn = setup();
        let me = user(&conn, "me");
        let teammate = user(&conn, "teammate");
        let task = board_task(&conn, &[&me, &teammate]);
        let shared = JournalService::create(&conn, &me, &body(Some(&task), "shared")).unwrap();

        // Teammates can read the shared entry but not touch it.
        let patch = EntryUpdate { title: Some("Hijacked".to_string()), ..EntryUpdate::default() };
        assert!(matches!(
            JournalService::update(&conn, &teammate, &shared.entry.id, &patch),
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            JournalService::delete(&conn, &teammate, &shared.entry.id),
            Err(DomainError::NotFound { .. })
        ));

        let updated = JournalService::update(&conn, &me, &shared.entry.id, &patch).unwrap();
        assert_eq!(updated.entry.title, "Hijacked");
    }

    #[test]
    fn update_can_detach_the_task() {
        let conn = setup();
        let me = user(&conn, "me");
        let task = board_task(&conn, &[&me]);
        let created = JournalService::create(&conn, &me, &body(Some(&task), "shared")).unwrap();

        let patch = EntryUpdate { task_id: Some(None), ..EntryUpdate::default() };
        let updated = JournalService::update(&conn, &me, &created.entry.id, &patch).unwrap();
        assert!(updated.entry.task_id.is_none());
    }

    #[test]
    fn update_validates_like_create() {
        let conn = setup();
        let me = user(&conn, "me");
        let created = JournalService::create(&conn, &me, &body(None, "private")).unwrap();

        let cases = vec![
            EntryUpdate { title: Some(" ".to_string()), ..EntryUpdate::default() },
            EntryUpdate { content: Some(String::new()), ..EntryUpdate::default() },
            EntryUpdate { valence: Some(-2.0), ..EntryUpdate::default() },
            EntryUpdate { visibility: Some("team".to_string()), ..EntryUpdate::default() },
            EntryUpdate { task_id: Some(Some("tsk_nope".to_string())), ..EntryUpdate::default() },
        ];
        for case in cases {
            assert!(
                matches!(
                    JournalService::update(&conn, &me, &created.entry.id, &case),
                    Err(DomainError::Validation(_))
                ),
                "accepted {case:?}"
            );
        }
    }

    #[test]
    fn delete_removes_the_entry() {
        let conn = setup();
        let me = user(&conn, "me");
        let created = JournalService::create(&conn, &me, &body(None, "private")).unwrap();

        JournalService::delete(&conn, &me, &created.entry.id).unwrap();
        assert!(matches!(
            JournalService::get(&conn, &me, &created.entry.id),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn available_tasks_follow_board_membership() {
        let conn = setup();
        let me = user(&conn, "me");
        let other = user(&conn, "other");
        let mine = board_task(&conn, &[&me]);
        board_task(&conn, &[&other]);

        let tasks = JournalService::available_tasks(&conn, &me).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task.id, mine);
    }
}
