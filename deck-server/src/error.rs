//! Error types for swipedeck-server.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use swipedeck_types::{ErrorBody, PersonId, SwipeError};
use tracing::error;

/// Main error type for request handling.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The `X-Device-ID` header was absent or blank.
    #[error("X-Device-ID header is required")]
    MissingDeviceId,

    /// The `X-Device-ID` header was present but unusable.
    #[error("invalid X-Device-ID header: {0}")]
    InvalidDeviceId(#[from] SwipeError),

    /// No visible person has this id.
    #[error("Person not found")]
    PersonNotFound {
        /// The requested id.
        id: PersonId,
    },

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingDeviceId | Self::InvalidDeviceId(_) => StatusCode::BAD_REQUEST,
            Self::PersonNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(e) => {
                error!(error = %e, "Storage failure while handling request");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Storage layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back to a domain value.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// Database path error.
    #[error("invalid database path: {path}")]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
    },
}

/// Result type alias for request handling.
pub type Result<T> = std::result::Result<T, ServerError>;
