use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the task store's mutation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task '{task_id}' not found")]
    TaskNotFound { task_id: String },

    #[error("subtask '{subtask_id}' not found in task '{task_id}'")]
    SubtaskNotFound { task_id: String, subtask_id: String },

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid status: '{status}'")]
    InvalidStatus { status: String },

    #[error("invalid priority: '{priority}'")]
    InvalidPriority { priority: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::TaskNotFound { .. } | StoreError::SubtaskNotFound { .. } => {
                Self::not_found(err.to_string())
            }
            StoreError::EmptyTitle
            | StoreError::InvalidStatus { .. }
            | StoreError::InvalidPriority { .. } => Self::bad_request(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
