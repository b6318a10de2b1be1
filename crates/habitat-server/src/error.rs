use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use habitat_store::{KvError, StoreError};
use habitat_types::TypeError;
use serde::Serialize;
use thiserror::Error;

use crate::resolve::ResolveError;

/// Errors from configuring or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("backend error: {0}")]
    Backend(#[from] KvError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Errors a request handler can end with, one variant per HTTP status class.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client payload is malformed or breaks a field rule.
    #[error("{0}")]
    Validation(String),

    /// The entity or one of its ancestors does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Creating the entity would replace an existing one with the same id.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TypeError> for ApiError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { reason, .. } => Self::NotFound(reason),
            ResolveError::Store { source, .. } => Self::Store(source),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Level;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Store(StoreError::not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Store(StoreError::Backend(KvError::Unavailable("x".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_message_passes_through() {
        let err = ApiError::from(StoreError::Backend(KvError::Unavailable(
            "store unavailable".into(),
        )));
        assert_eq!(err.to_string(), "store unavailable");
    }

    #[test]
    fn resolve_errors_map_by_kind() {
        let not_found = ApiError::from(ResolveError::NotFound {
            level: Level::Floor,
            reason: "floor 'f1' not found".into(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let failed = ApiError::from(ResolveError::Store {
            level: Level::Building,
            source: StoreError::Serialization("bad".into()),
        });
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn error_body_shape() {
        let response = ApiError::Conflict("building 'a' already exists".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "building 'a' already exists"}));
    }
}
