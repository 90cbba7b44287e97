use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything a handler can fail with. Client errors carry a fixed
/// plain-text body; storage failures are logged and answered generically.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid Todo Status")]
    InvalidStatus,
    #[error("Invalid Todo Priority")]
    InvalidPriority,
    #[error("Invalid Todo Category")]
    InvalidCategory,
    #[error("Invalid Due Date")]
    InvalidDueDate,
    #[error("Todo Not Found")]
    NotFound,
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidStatus
            | AppError::InvalidPriority
            | AppError::InvalidCategory
            | AppError::InvalidDueDate => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::Storage(err) => {
                tracing::error!(error = ?err, "storage request failed");
                (status, "Internal Server Error").into_response()
            }
            other => {
                tracing::debug!(%status, reason = %other, "rejecting request");
                (status, other.to_string()).into_response()
            }
        }
    }
}
