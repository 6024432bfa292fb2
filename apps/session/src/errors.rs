use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::session::WorkspaceError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(BackendError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::NotFound(what) => AppError::NotFound(what),
            BackendError::InvalidId(_) => AppError::Validation(e.to_string()),
            other => AppError::Upstream(other),
        }
    }
}

impl From<WorkspaceError> for AppError {
    fn from(e: WorkspaceError) -> Self {
        match e {
            WorkspaceError::NoSession
            | WorkspaceError::UnknownSection(_)
            | WorkspaceError::InvalidValue { .. } => AppError::Validation(e.to_string()),
            WorkspaceError::Storage(inner) => AppError::Storage(inner),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            // The banner shows the backend's own message.
            AppError::Upstream(e) => {
                tracing::warn!("Upstream error: {e}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Local session storage is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_not_found_maps_to_404() {
        let err = AppError::from(BackendError::NotFound("/api/tailor/tailored/7".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_backend_api_error_maps_to_bad_gateway() {
        let err = AppError::from(BackendError::Api {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, AppError::Upstream(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_workspace_errors_map_to_statuses() {
        let status = |e: WorkspaceError| AppError::from(e).into_response().status();
        assert_eq!(status(WorkspaceError::NoSession), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(WorkspaceError::UnknownSection("x".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_invalid_comparison_id_is_a_validation_error() {
        let err = AppError::from(BackendError::InvalidId("../x".to_string()));
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
