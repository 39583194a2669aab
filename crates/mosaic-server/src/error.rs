//! API error type and its HTTP mapping.
//!
//! Every handler returns [`ApiError`] on failure, which serializes as
//! `{"code": "...", "message": "..."}`. Domain errors map one-to-one onto
//! the four codes; storage failures are logged server-side and surface as
//! a generic `INTERNAL_ERROR` so responses never leak SQL or pool detail.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mosaic_domain::DomainError;
use serde::Serialize;
use tracing::error;

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request payload or parameters failed validation (400).
    #[error("{0}")]
    Validation(String),
    /// Missing or rejected credentials (401).
    #[error("{0}")]
    Unauthorized(String),
    /// Entity absent or hidden by visibility rules (404).
    #[error("{0}")]
    NotFound(String),
    /// Unexpected server-side failure (500).
    #[error("{0}")]
    Internal(String),
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ApiError {
    /// Status code and wire code for this error.
    #[must_use]
    pub fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => Self::Validation(message),
            DomainError::Unauthorized(message) => Self::Unauthorized(message),
            err @ DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::Store(store) => {
                error!(error = %store, "storage failure");
                Self::Internal("internal server error".to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_db::StoreError;

    #[test]
    fn statuses_and_codes() {
        let cases = [
            (
                ApiError::Validation("v".into()),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                ApiError::Unauthorized("u".into()),
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
            (
                ApiError::NotFound("n".into()),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                ApiError::Internal("i".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.parts(), (status, code));
        }
    }

    #[test]
    fn domain_errors_map_one_to_one() {
        let err = ApiError::from(DomainError::validation("bad"));
        assert!(matches!(err, ApiError::Validation(_)));

        let err = ApiError::from(DomainError::task_not_found("tsk_1"));
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Task not found: tsk_1");

        let err = ApiError::from(DomainError::Unauthorized("nope".into()));
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn store_errors_are_scrubbed() {
        let store = DomainError::Store(StoreError::Migration {
            message: "secret path /var/db".into(),
        });
        let err = ApiError::from(store);
        assert!(matches!(err, ApiError::Internal(_)));
        assert!(!err.to_string().contains("/var/db"));
    }

    #[tokio::test]
    async fn response_body_carries_code_and_message() {
        let response = ApiError::NotFound("Board not found: brd_9".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), 10_000)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed["code"], "NOT_FOUND");
        assert_eq!(parsed["message"], "Board not found: brd_9");
    }
}
