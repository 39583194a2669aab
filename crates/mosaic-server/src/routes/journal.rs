//! Journal entry and report routes.
//!
//! The report paths share the `/journal-entries` prefix with the entry
//! detail route; static segments win over `{id}` in the router, so
//! `mood-statistics` and friends never get captured as entry ids.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use mosaic_db::repositories::{DailyMoodRow, HeatmapCellRow, ListSummaryRow, MoodPointRow};
use mosaic_domain::journal::EntryFilter;
use mosaic_domain::{AccountService, JournalService, ReportsService};

use crate::dto::{
    EntryBody, EntryCreateBody, EntryPatchBody, EntryQuery, MoodRangeQuery, TaskBody, TaskMoodBody,
    UserBody,
};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::{AppState, with_conn};

/// Journal route table.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries).post(create_entry))
        .route("/journal-entries/mood-statistics", get(mood_statistics))
        .route("/journal-entries/heatmap-data", get(heatmap_data))
        .route(
            "/journal-entries/task-mood-statistics/{task_id}",
            get(task_mood_statistics),
        )
        .route(
            "/journal-entries/task-mood-history/{task_id}",
            get(task_mood_history),
        )
        .route(
            "/journal-entries/project-overview/{board_id}",
            get(project_overview),
        )
        .route("/journal-entries/available-tasks", get(available_tasks))
        .route("/journal-entries/shareable-users", get(shareable_users))
        .route(
            "/journal-entries/{id}",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
}

/// `GET /api/journal-entries` — visible entries, newest first.
async fn list_entries(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<EntryQuery>,
) -> Result<Json<Vec<EntryBody>>, ApiError> {
    let filter = EntryFilter {
        task_id: query.task_id,
        visibility: query.visibility,
    };
    let entries = with_conn(&state, move |conn| {
        JournalService::list(conn, &user.id, &filter)
    })
    .await?;
    Ok(Json(entries.into_iter().map(EntryBody::from).collect()))
}

/// `POST /api/journal-entries`
async fn create_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<EntryCreateBody>, ApiError>,
) -> Result<(StatusCode, Json<EntryBody>), ApiError> {
    let params = body.into_params();
    let detail = with_conn(&state, move |conn| {
        JournalService::create(conn, &user.id, &params)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(EntryBody::from(detail))))
}

/// `GET /api/journal-entries/{id}` — visibility-filtered.
async fn get_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
) -> Result<Json<EntryBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        JournalService::get(conn, &user.id, &entry_id)
    })
    .await?;
    Ok(Json(EntryBody::from(detail)))
}

/// `PATCH /api/journal-entries/{id}` — author only.
async fn update_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<EntryPatchBody>, ApiError>,
) -> Result<Json<EntryBody>, ApiError> {
    let params = body.into_params();
    let detail = with_conn(&state, move |conn| {
        JournalService::update(conn, &user.id, &entry_id, &params)
    })
    .await?;
    Ok(Json(EntryBody::from(detail)))
}

/// `DELETE /api/journal-entries/{id}` — author only.
async fn delete_entry(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(entry_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_conn(&state, move |conn| {
        JournalService::delete(conn, &user.id, &entry_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/journal-entries/mood-statistics?from=&to=`
async fn mood_statistics(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<MoodRangeQuery>,
) -> Result<Json<Vec<DailyMoodRow>>, ApiError> {
    let rows = with_conn(&state, move |conn| {
        ReportsService::mood_statistics(
            conn,
            &user.id,
            query.from.as_deref(),
            query.to.as_deref(),
        )
    })
    .await?;
    Ok(Json(rows))
}

/// `GET /api/journal-entries/heatmap-data`
async fn heatmap_data(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<HeatmapCellRow>>, ApiError> {
    let cells = with_conn(&state, move |conn| {
        ReportsService::heatmap_data(conn, &user.id)
    })
    .await?;
    Ok(Json(cells))
}

/// `GET /api/journal-entries/task-mood-statistics/{task_id}`
async fn task_mood_statistics(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<TaskMoodBody>, ApiError> {
    let echoed = task_id.clone();
    let stats = with_conn(&state, move |conn| {
        ReportsService::task_mood_statistics(conn, &user.id, &task_id)
    })
    .await?;
    Ok(Json(TaskMoodBody {
        task_id: echoed,
        stats,
    }))
}

/// `GET /api/journal-entries/task-mood-history/{task_id}`
async fn task_mood_history(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<Vec<MoodPointRow>>, ApiError> {
    let points = with_conn(&state, move |conn| {
        ReportsService::task_mood_history(conn, &user.id, &task_id)
    })
    .await?;
    Ok(Json(points))
}

/// `GET /api/journal-entries/project-overview/{board_id}`
async fn project_overview(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<String>,
) -> Result<Json<Vec<ListSummaryRow>>, ApiError> {
    let rows = with_conn(&state, move |conn| {
        ReportsService::project_overview(conn, &user.id, &board_id)
    })
    .await?;
    Ok(Json(rows))
}

/// `GET /api/journal-entries/available-tasks`
async fn available_tasks(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<TaskBody>>, ApiError> {
    let tasks = with_conn(&state, move |conn| {
        JournalService::available_tasks(conn, &user.id)
    })
    .await?;
    Ok(Json(tasks.into_iter().map(TaskBody::from).collect()))
}

/// `GET /api/journal-entries/shareable-users`
async fn shareable_users(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<UserBody>>, ApiError> {
    let users = with_conn(&state, move |conn| {
        AccountService::shareable_users(conn, &user.id)
    })
    .await?;
    Ok(Json(users.into_iter().map(UserBody::from).collect()))
}
