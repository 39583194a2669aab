//! List routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use mosaic_domain::{ListService, ordering};

use crate::dto::{ListBody, ListCreateBody, ListMoveBody, ListPatchBody, ListQuery};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::{AppState, with_conn};

/// List route table.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lists", get(list_lists).post(create_list))
        .route(
            "/lists/{id}",
            get(get_list).patch(rename_list).delete(delete_list),
        )
        .route("/lists/{id}/move", post(move_list))
}

/// `GET /api/lists` — optionally filtered with `?board_id=`.
async fn list_lists(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ListBody>>, ApiError> {
    let lists = with_conn(&state, move |conn| {
        ListService::list(conn, &user.id, query.board_id.as_deref())
    })
    .await?;
    Ok(Json(lists.into_iter().map(ListBody::from).collect()))
}

/// `POST /api/lists`
async fn create_list(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<ListCreateBody>, ApiError>,
) -> Result<(StatusCode, Json<ListBody>), ApiError> {
    let detail = with_conn(&state, move |conn| {
        ListService::create(conn, &user.id, &body.board_id, &body.name)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(ListBody::from(detail))))
}

/// `GET /api/lists/{id}` — detail with nested tasks.
async fn get_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(list_id): Path<String>,
) -> Result<Json<ListBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        ListService::get(conn, &user.id, &list_id)
    })
    .await?;
    Ok(Json(ListBody::from(detail)))
}

/// `PATCH /api/lists/{id}`
async fn rename_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(list_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<ListPatchBody>, ApiError>,
) -> Result<Json<ListBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        ListService::rename(conn, &user.id, &list_id, &body.name)
    })
    .await?;
    Ok(Json(ListBody::from(detail)))
}

/// `DELETE /api/lists/{id}` — closes the position gap on the board.
async fn delete_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(list_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_conn(&state, move |conn| {
        ListService::delete(conn, &user.id, &list_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/lists/{id}/move`
async fn move_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(list_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<ListMoveBody>, ApiError>,
) -> Result<Json<ListBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        let moved = ordering::move_list(conn, &user.id, &list_id, body.position)?;
        ListService::get(conn, &user.id, &moved.id)
    })
    .await?;
    Ok(Json(ListBody::from(detail)))
}
