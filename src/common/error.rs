use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::common::response::ApiResponse;
use crate::infrastructure::media::MediaError;
use crate::infrastructure::storage::StorageError;
use crate::modules::video::locator::LocatorError;
use crate::modules::video::repository::RepositoryError;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a request can end with.
///
/// Client input errors carry their message to the caller. Infrastructure and
/// data-integrity errors are logged in full and answered with a generic message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("media processing failed: {0}")]
    Media(#[from] MediaError),

    #[error("object storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("stored video locator is invalid: {0}")]
    Locator(#[from] LocatorError),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Media(_)
            | AppError::Storage(_)
            | AppError::Locator(_)
            | AppError::Repository(_)
            | AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Media(_) => "Couldn't process video".to_string(),
            AppError::Storage(_) => "Couldn't reach object storage".to_string(),
            AppError::Locator(_) => "Couldn't resolve video URL".to_string(),
            AppError::Repository(_) => "Couldn't access video records".to_string(),
            AppError::Io(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Request body exceeds the upload limit".to_string())
        } else {
            AppError::BadRequest(format!("Couldn't parse multipart form: {}", e.body_text()))
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let response = ApiResponse::<()>::error(&self.public_message());
        (status, Json(response)).into_response()
    }
}
