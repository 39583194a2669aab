//! Wire DTOs for the REST API.
//!
//! Request bodies deserialize with the field names the frontend sends
//! (`board` and `list` for container references on create, `list_id` on
//! move). Response bodies are assembled from domain detail structs;
//! nullable fields serialize as JSON `null` except `BoardBody::lists`,
//! which is omitted entirely on summary responses.
//!
//! Patch bodies distinguish "field absent" from "field null" with
//! `Option<Option<T>>` via [`double_option`]: absent leaves the field
//! unchanged, `null` clears it.

use mosaic_core::time::is_past;
use mosaic_db::repositories::TaskMoodRow;
use mosaic_db::rows::UserRow;
use mosaic_domain::journal::{EntryCreate, EntryUpdate};
use mosaic_domain::tasks::{TaskCreate, TaskUpdate};
use mosaic_domain::{BoardDetail, BoardSummary, EntryDetail, ListDetail, TaskDetail};
use serde::{Deserialize, Deserializer, Serialize};

/// Treat a present-but-null JSON field as `Some(None)`.
///
/// Combined with `#[serde(default)]`, an absent field stays `None`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ─────────────────────────────────────────────────────────────────────────────
// Request bodies
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/register` and `POST /api/login` payload.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    /// Account username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// `POST /api/token/refresh` payload.
#[derive(Debug, Deserialize)]
pub struct RefreshBody {
    /// Refresh token from login.
    pub refresh: String,
}

/// Board create/rename payload.
#[derive(Debug, Deserialize)]
pub struct BoardNameBody {
    /// Board name.
    pub name: String,
}

/// `POST /api/boards/{id}/add-member` payload.
#[derive(Debug, Deserialize)]
pub struct AddMemberBody {
    /// Username of the user to add.
    pub username: String,
}

/// `POST /api/lists` payload.
#[derive(Debug, Deserialize)]
pub struct ListCreateBody {
    /// Owning board id.
    #[serde(rename = "board")]
    pub board_id: String,
    /// List name.
    pub name: String,
}

/// List rename payload.
#[derive(Debug, Deserialize)]
pub struct ListPatchBody {
    /// New name.
    pub name: String,
}

/// `POST /api/lists/{id}/move` payload.
#[derive(Debug, Deserialize)]
pub struct ListMoveBody {
    /// Target position within the board.
    pub position: i64,
}

/// `GET /api/lists` query string.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Restrict to one board.
    pub board_id: Option<String>,
}

/// `POST /api/tasks` payload.
#[derive(Debug, Deserialize)]
pub struct TaskCreateBody {
    /// Owning list id.
    #[serde(rename = "list")]
    pub list_id: String,
    /// Task title.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional RFC 3339 due date.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Priority 1..=3.
    #[serde(default)]
    pub priority: Option<i64>,
    /// Complexity 1..=3.
    #[serde(default)]
    pub complexity: Option<i64>,
    /// Initial assignee user ids.
    #[serde(default)]
    pub assigned_to_ids: Option<Vec<String>>,
}

impl TaskCreateBody {
    /// Convert into domain parameters.
    #[must_use]
    pub fn into_params(self) -> TaskCreate {
        TaskCreate {
            list_id: self.list_id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            due_date: self.due_date,
            priority: self.priority,
            complexity: self.complexity,
            assigned_to_ids: self.assigned_to_ids,
        }
    }
}

/// `PATCH /api/tasks/{id}` payload.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPatchBody {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New due date; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<i64>,
    /// New complexity.
    #[serde(default)]
    pub complexity: Option<i64>,
    /// Replacement assignee set.
    #[serde(default)]
    pub assigned_to_ids: Option<Vec<String>>,
}

impl TaskPatchBody {
    /// Convert into domain parameters.
    #[must_use]
    pub fn into_params(self) -> TaskUpdate {
        TaskUpdate {
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            complexity: self.complexity,
            assigned_to_ids: self.assigned_to_ids,
        }
    }
}

/// `POST /api/tasks/{id}/move` payload.
#[derive(Debug, Deserialize)]
pub struct TaskMoveBody {
    /// Target position within the destination list.
    pub position: i64,
    /// Destination list; same list when absent.
    #[serde(default)]
    pub list_id: Option<String>,
}

/// `POST /api/journal-entries` payload.
#[derive(Debug, Deserialize)]
pub struct EntryCreateBody {
    /// Optional referenced task.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Entry title.
    pub title: String,
    /// Entry content.
    pub content: String,
    /// Mood valence in [-1, 1]; required, but validated in the domain.
    #[serde(default)]
    pub valence: Option<f64>,
    /// Mood arousal in [-1, 1]; required, but validated in the domain.
    #[serde(default)]
    pub arousal: Option<f64>,
    /// `private` (default) or `shared`.
    #[serde(default)]
    pub visibility: Option<String>,
}

impl EntryCreateBody {
    /// Convert into domain parameters.
    #[must_use]
    pub fn into_params(self) -> EntryCreate {
        EntryCreate {
            task_id: self.task_id,
            title: self.title,
            content: self.content,
            valence: self.valence,
            arousal: self.arousal,
            visibility: self.visibility,
        }
    }
}

/// `PATCH /api/journal-entries/{id}` payload.
#[derive(Debug, Default, Deserialize)]
pub struct EntryPatchBody {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New content.
    #[serde(default)]
    pub content: Option<String>,
    /// New valence.
    #[serde(default)]
    pub valence: Option<f64>,
    /// New arousal.
    #[serde(default)]
    pub arousal: Option<f64>,
    /// New visibility.
    #[serde(default)]
    pub visibility: Option<String>,
    /// New task reference; `null` detaches.
    #[serde(default, deserialize_with = "double_option")]
    pub task_id: Option<Option<String>>,
}

impl EntryPatchBody {
    /// Convert into domain parameters.
    #[must_use]
    pub fn into_params(self) -> EntryUpdate {
        EntryUpdate {
            title: self.title,
            content: self.content,
            valence: self.valence,
            arousal: self.arousal,
            visibility: self.visibility,
            task_id: self.task_id,
        }
    }
}

/// `GET /api/journal-entries` query string.
#[derive(Debug, Default, Deserialize)]
pub struct EntryQuery {
    /// Restrict to one task.
    pub task_id: Option<String>,
    /// Restrict to one visibility value.
    pub visibility: Option<String>,
}

/// `GET /api/journal-entries/mood-statistics` query string.
#[derive(Debug, Default, Deserialize)]
pub struct MoodRangeQuery {
    /// Inclusive start day, `YYYY-MM-DD`.
    pub from: Option<String>,
    /// Inclusive end day, `YYYY-MM-DD`.
    pub to: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Response bodies
// ─────────────────────────────────────────────────────────────────────────────

/// Public user representation.
#[derive(Debug, Clone, Serialize)]
pub struct UserBody {
    /// User id.
    pub id: String,
    /// Username.
    pub username: String,
}

impl From<UserRow> for UserBody {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
        }
    }
}

/// Task representation with resolved assignees.
#[derive(Debug, Serialize)]
pub struct TaskBody {
    /// Task id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Due date, RFC 3339 UTC, or `null`.
    pub due_date: Option<String>,
    /// Priority 1..=3.
    pub priority: i64,
    /// Complexity 1..=3.
    pub complexity: i64,
    /// Owning list.
    pub list_id: String,
    /// Zero-based position within the list.
    pub position: i64,
    /// Assignees, ordered by username.
    pub assigned_to: Vec<UserBody>,
    /// Whether the due date is in the past.
    pub is_overdue: bool,
}

impl From<TaskDetail> for TaskBody {
    fn from(detail: TaskDetail) -> Self {
        let is_overdue = detail.task.due_date.as_deref().is_some_and(is_past);
        Self {
            id: detail.task.id,
            title: detail.task.title,
            description: detail.task.description,
            due_date: detail.task.due_date,
            priority: detail.task.priority,
            complexity: detail.task.complexity,
            list_id: detail.task.list_id,
            position: detail.task.position,
            assigned_to: detail.assignees.into_iter().map(UserBody::from).collect(),
            is_overdue,
        }
    }
}

/// List representation with nested tasks.
#[derive(Debug, Serialize)]
pub struct ListBody {
    /// List id.
    pub id: String,
    /// Owning board.
    pub board_id: String,
    /// Name.
    pub name: String,
    /// Zero-based position within the board.
    pub position: i64,
    /// Tasks in position order.
    pub tasks: Vec<TaskBody>,
}

impl From<ListDetail> for ListBody {
    fn from(detail: ListDetail) -> Self {
        Self {
            id: detail.list.id,
            board_id: detail.list.board_id,
            name: detail.list.name,
            position: detail.list.position,
            tasks: detail.tasks.into_iter().map(TaskBody::from).collect(),
        }
    }
}

/// Board representation; `lists` is present only on detail responses.
#[derive(Debug, Serialize)]
pub struct BoardBody {
    /// Board id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Members, ordered by username.
    pub members: Vec<UserBody>,
    /// Lists with nested tasks (detail responses only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lists: Option<Vec<ListBody>>,
}

impl From<BoardSummary> for BoardBody {
    fn from(summary: BoardSummary) -> Self {
        Self {
            id: summary.board.id,
            name: summary.board.name,
            members: summary.members.into_iter().map(UserBody::from).collect(),
            lists: None,
        }
    }
}

impl From<BoardDetail> for BoardBody {
    fn from(detail: BoardDetail) -> Self {
        Self {
            id: detail.board.id,
            name: detail.board.name,
            members: detail.members.into_iter().map(UserBody::from).collect(),
            lists: Some(detail.lists.into_iter().map(ListBody::from).collect()),
        }
    }
}

/// Journal entry representation with resolved author.
#[derive(Debug, Serialize)]
pub struct EntryBody {
    /// Entry id.
    pub id: String,
    /// Author.
    pub author: UserBody,
    /// Referenced task, or `null`.
    pub task_id: Option<String>,
    /// Title.
    pub title: String,
    /// Content.
    pub content: String,
    /// Mood valence in [-1, 1].
    pub valence: f64,
    /// Mood arousal in [-1, 1].
    pub arousal: f64,
    /// `private` or `shared`.
    pub visibility: String,
    /// Creation timestamp, RFC 3339 UTC.
    pub created_at: String,
}

impl From<EntryDetail> for EntryBody {
    fn from(detail: EntryDetail) -> Self {
        Self {
            id: detail.entry.id,
            author: UserBody::from(detail.author),
            task_id: detail.entry.task_id,
            title: detail.entry.title,
            content: detail.entry.content,
            valence: detail.entry.valence,
            arousal: detail.entry.arousal,
            visibility: detail.entry.visibility,
            created_at: detail.entry.created_at,
        }
    }
}

/// Per-task mood aggregate with the task id echoed back.
#[derive(Debug, Serialize)]
pub struct TaskMoodBody {
    /// The task the aggregate covers.
    pub task_id: String,
    /// Aggregate counters and averages.
    #[serde(flatten)]
    pub stats: TaskMoodRow,
}

/// `POST /api/token/refresh` response.
#[derive(Debug, Serialize)]
pub struct AccessBody {
    /// Fresh access token.
    pub access: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_db::rows::TaskRow;

    fn task_row(due_date: Option<&str>) -> TaskRow {
        TaskRow {
            id: "tsk_1".into(),
            list_id: "lst_1".into(),
            title: "t".into(),
            description: String::new(),
            due_date: due_date.map(str::to_string),
            priority: 2,
            complexity: 2,
            position: 0,
            created_at: "2026-01-01T00:00:00Z".into(),
            updated_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn task_create_accepts_frontend_field_names() {
        let body: TaskCreateBody = serde_json::from_str(
            r#"{"list": "lst_1", "title": "Ship it", "assigned_to_ids": ["usr_1"]}"#,
        )
        .unwrap();
        assert_eq!(body.list_id, "lst_1");

        let params = body.into_params();
        assert_eq!(params.description, "");
        assert_eq!(params.assigned_to_ids.as_deref(), Some(&["usr_1".to_string()][..]));
        assert!(params.priority.is_none());
    }

    #[test]
    fn list_create_accepts_board_field() {
        let body: ListCreateBody =
            serde_json::from_str(r#"{"board": "brd_1", "name": "Doing"}"#).unwrap();
        assert_eq!(body.board_id, "brd_1");
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let body: TaskPatchBody = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(body.due_date.is_none());

        let body: TaskPatchBody = serde_json::from_str(r#"{"due_date": null}"#).unwrap();
        assert_eq!(body.due_date, Some(None));

        let body: TaskPatchBody =
            serde_json::from_str(r#"{"due_date": "2026-03-01T00:00:00Z"}"#).unwrap();
        assert_eq!(body.due_date, Some(Some("2026-03-01T00:00:00Z".into())));
    }

    #[test]
    fn entry_patch_task_id_null_detaches() {
        let body: EntryPatchBody = serde_json::from_str(r#"{"task_id": null}"#).unwrap();
        assert_eq!(body.task_id, Some(None));
        assert!(body.title.is_none());
    }

    #[test]
    fn overdue_is_computed_from_due_date() {
        let past = TaskBody::from(TaskDetail {
            task: task_row(Some("2001-01-01T00:00:00Z")),
            assignees: Vec::new(),
        });
        assert!(past.is_overdue);

        let future = TaskBody::from(TaskDetail {
            task: task_row(Some("2999-01-01T00:00:00Z")),
            assignees: Vec::new(),
        });
        assert!(!future.is_overdue);

        let none = TaskBody::from(TaskDetail {
            task: task_row(None),
            assignees: Vec::new(),
        });
        assert!(!none.is_overdue);
    }

    #[test]
    fn board_summary_omits_lists_key() {
        let body = BoardBody {
            id: "brd_1".into(),
            name: "B".into(),
            members: Vec::new(),
            lists: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("lists").is_none());

        let body = BoardBody {
            lists: Some(Vec::new()),
            ..body
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json["lists"].is_array());
    }

    #[test]
    fn task_mood_body_flattens_stats() {
        let body = TaskMoodBody {
            task_id: "tsk_1".into(),
            stats: TaskMoodRow {
                entry_count: 2,
                avg_valence: Some(0.5),
                avg_arousal: Some(-0.1),
                first_entry_at: Some("2026-01-01T00:00:00Z".into()),
                last_entry_at: Some("2026-01-02T00:00:00Z".into()),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["task_id"], "tsk_1");
        assert_eq!(json["entry_count"], 2);
        assert_eq!(json["avg_valence"], 0.5);
    }
}
