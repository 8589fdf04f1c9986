use crate::validation::ValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

// --- Record store errors ---

#[derive(Error, Debug)]
pub enum RepoError {
    /// The store answered but refused the operation. `message` is the store's own text.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Record store unreachable: {0:#}")]
    Transport(#[from] anyhow::Error),

    #[error("Record store returned malformed data: {0}")]
    DataCorruption(String),
}

// --- Service errors ---

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Post not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] RepoError),
}

// --- Web layer error ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Initialization error: {0}")]
    InitError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<crate::config::ConfigError> for AppError {
    fn from(err: crate::config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InitError(err.to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Service(ServiceError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Service(ServiceError::Store(_)) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) | AppError::InitError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            tracing::error!(error.detail = %self, "Responding with internal error");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error.status = %status, error.message = %self, "Responding with client error");
            self.to_string()
        };

        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}
