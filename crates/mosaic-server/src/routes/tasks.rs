//! Task routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use mosaic_domain::{TaskService, ordering};

use crate::dto::{TaskBody, TaskCreateBody, TaskMoveBody, TaskPatchBody};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::{AppState, with_conn};

/// Task route table.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/move", post(move_task))
        .route("/tasks/{id}/assign", post(assign_task))
}

/// `GET /api/tasks` — every task on the requester's boards.
async fn list_tasks(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<TaskBody>>, ApiError> {
    let tasks = with_conn(&state, move |conn| TaskService::list(conn, &user.id)).await?;
    Ok(Json(tasks.into_iter().map(TaskBody::from).collect()))
}

/// `POST /api/tasks`
async fn create_task(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<TaskCreateBody>, ApiError>,
) -> Result<(StatusCode, Json<TaskBody>), ApiError> {
    let params = body.into_params();
    let detail = with_conn(&state, move |conn| {
        TaskService::create(conn, &user.id, &params)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(TaskBody::from(detail))))
}

/// `GET /api/tasks/{id}`
async fn get_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<TaskBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        TaskService::get(conn, &user.id, &task_id)
    })
    .await?;
    Ok(Json(TaskBody::from(detail)))
}

/// `PATCH /api/tasks/{id}`
async fn update_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<TaskPatchBody>, ApiError>,
) -> Result<Json<TaskBody>, ApiError> {
    let params = body.into_params();
    let detail = with_conn(&state, move |conn| {
        TaskService::update(conn, &user.id, &task_id, &params)
    })
    .await?;
    Ok(Json(TaskBody::from(detail)))
}

/// `DELETE /api/tasks/{id}` — closes the position gap in the list.
async fn delete_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_conn(&state, move |conn| {
        TaskService::delete(conn, &user.id, &task_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/tasks/{id}/move`
async fn move_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<TaskMoveBody>, ApiError>,
) -> Result<Json<TaskBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        let moved = ordering::move_task(
            conn,
            &user.id,
            &task_id,
            body.position,
            body.list_id.as_deref(),
        )?;
        TaskService::get(conn, &user.id, &moved.id)
    })
    .await?;
    Ok(Json(TaskBody::from(detail)))
}

/// `POST /api/tasks/{id}/assign` — adds the requester to the assignees.
async fn assign_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(task_id): Path<String>,
) -> Result<Json<TaskBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        TaskService::assign_self(conn, &user.id, &task_id)
    })
    .await?;
    Ok(Json(TaskBody::from(detail)))
}
