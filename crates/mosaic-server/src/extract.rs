//! Authenticated-user extractor.

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated user, extracted from the `Authorization` header.
///
/// Handlers that take this parameter reject requests without a valid
/// bearer access token with 401 before the handler body runs.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// User id (`usr_` prefixed).
    pub id: String,
    /// Username at token issue time.
    pub username: String,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;
        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("authorization header is not a bearer token".to_string())
        })?;
        let claims = state
            .tokens
            .verify_access(token)
            .map_err(|err| ApiError::Unauthorized(err.to_string()))?;
        Ok(Self {
            id: claims.sub,
            username: claims.username,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
