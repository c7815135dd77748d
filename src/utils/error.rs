use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::repository::StorageError;
use crate::utils::response::error as error_response;
use crate::validation::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// `message` is safe to show callers; `source` is only logged.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StorageError,
    },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn storage(message: &'static str) -> impl FnOnce(StorageError) -> Self {
        move |source| AppError::Storage { message, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidBody(_) => "INVALID_BODY",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Storage { .. } => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::InvalidBody(msg) | AppError::NotFound(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
            AppError::Storage { message, .. } => message.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Storage { message, source } => {
                error!(error = ?source, message = %message, "Storage error");
            }
            _ => {
                error!(error = ?self, message = %self.public_message(), "Application error");
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        error_response(self.code(), self.public_message(), self.status_code())
    }
}
