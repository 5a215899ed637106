use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::guard::Rejection;

/// Every failure a single request can end in. None of them is fatal to the process.
#[derive(Error, Debug)]
pub enum FileServerError {
    #[error("File not found")]
    NotFound,

    #[error("Access denied")]
    Forbidden,

    #[error("Failed to list files")]
    Enumeration(#[source] std::io::Error),

    #[error("Internal server error")]
    Io(#[from] std::io::Error),
}

impl From<Rejection> for FileServerError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::NotFound => FileServerError::NotFound,
            Rejection::Forbidden => FileServerError::Forbidden,
        }
    }
}

impl FileServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FileServerError::NotFound => StatusCode::NOT_FOUND,
            FileServerError::Forbidden => StatusCode::FORBIDDEN,
            FileServerError::Enumeration(_) | FileServerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            FileServerError::NotFound => "NOT_FOUND",
            FileServerError::Forbidden => "FORBIDDEN",
            FileServerError::Enumeration(_) => "ENUMERATION_FAILED",
            FileServerError::Io(_) => "IO_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for FileServerError {
    fn into_response(self) -> Response {
        // The source error stays in the log; the client only sees the fixed message.
        match &self {
            FileServerError::Enumeration(err) => error!("Directory enumeration failed: {}", err),
            FileServerError::Io(err) => error!("File I/O failed: {}", err),
            FileServerError::NotFound | FileServerError::Forbidden => {}
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
