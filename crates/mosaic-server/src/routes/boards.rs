//! Board routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use mosaic_domain::BoardService;

use crate::dto::{AddMemberBody, BoardBody, BoardNameBody};
use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::{AppState, with_conn};

/// Board route table.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/boards", get(list_boards).post(create_board))
        .route(
            "/boards/{id}",
            get(get_board).patch(rename_board).delete(delete_board),
        )
        .route("/boards/{id}/add-member", post(add_member))
}

/// `GET /api/boards`
async fn list_boards(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<BoardBody>>, ApiError> {
    let boards = with_conn(&state, move |conn| BoardService::list(conn, &user.id)).await?;
    Ok(Json(boards.into_iter().map(BoardBody::from).collect()))
}

/// `POST /api/boards`
async fn create_board(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<BoardNameBody>, ApiError>,
) -> Result<(StatusCode, Json<BoardBody>), ApiError> {
    let summary = with_conn(&state, move |conn| {
        BoardService::create(conn, &user.id, &body.name)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(BoardBody::from(summary))))
}

/// `GET /api/boards/{id}` — detail with nested lists and tasks.
async fn get_board(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<String>,
) -> Result<Json<BoardBody>, ApiError> {
    let detail = with_conn(&state, move |conn| {
        BoardService::get(conn, &user.id, &board_id)
    })
    .await?;
    Ok(Json(BoardBody::from(detail)))
}

/// `PATCH /api/boards/{id}`
async fn rename_board(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<BoardNameBody>, ApiError>,
) -> Result<Json<BoardBody>, ApiError> {
    let summary = with_conn(&state, move |conn| {
        BoardService::rename(conn, &user.id, &board_id, &body.name)
    })
    .await?;
    Ok(Json(BoardBody::from(summary)))
}

/// `DELETE /api/boards/{id}`
async fn delete_board(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_conn(&state, move |conn| {
        BoardService::delete(conn, &user.id, &board_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/boards/{id}/add-member`
async fn add_member(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(board_id): Path<String>,
    WithRejection(Json(body), _): WithRejection<Json<AddMemberBody>, ApiError>,
) -> Result<Json<BoardBody>, ApiError> {
    let summary = with_conn(&state, move |conn| {
        BoardService::add_member(conn, &user.id, &board_id, &body.username)
    })
    .await?;
    Ok(Json(BoardBody::from(summary)))
}
