//! Account routes: register, login, token refresh.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use mosaic_auth::TokenPair;
use mosaic_domain::AccountService;

use crate::dto::{AccessBody, CredentialsBody, RefreshBody, UserBody};
use crate::error::ApiError;
use crate::state::{AppState, with_conn};

/// Account route table.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh))
}

/// `POST /api/register`
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CredentialsBody>, ApiError>,
) -> Result<(StatusCode, Json<UserBody>), ApiError> {
    let user = with_conn(&state, move |conn| {
        AccountService::register(conn, &body.username, &body.password)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(UserBody::from(user))))
}

/// `POST /api/login`
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<CredentialsBody>, ApiError>,
) -> Result<Json<TokenPair>, ApiError> {
    let user = with_conn(&state, move |conn| {
        AccountService::authenticate(conn, &body.username, &body.password)
    })
    .await?;
    let pair = state
        .tokens
        .issue_pair(&user.id, &user.username)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(Json(pair))
}

/// `POST /api/token/refresh`
async fn refresh(
    State(state): State<AppState>,
    WithRejection(Json(body), _): WithRejection<Json<RefreshBody>, ApiError>,
) -> Result<Json<AccessBody>, ApiError> {
    let claims = state
        .tokens
        .verify_refresh(&body.refresh)
        .map_err(|err| ApiError::Unauthorized(err.to_string()))?;
    let access = state
        .tokens
        .issue_access(&claims.sub, &claims.username)
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(Json(AccessBody { access }))
}
