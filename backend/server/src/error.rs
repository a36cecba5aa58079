use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::routes::Envelope;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MalformedPayload(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{operation}: {cause}")]
    InternalError {
        operation: &'static str,
        cause: String,
    },
}

impl AppError {
    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedPayload(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match self {
            AppError::InternalError { operation, cause } => {
                error!(%cause, "{operation}");
                Envelope::<()>::failure(operation, Some(cause))
            }
            other => Envelope::<()>::failure(other.to_string(), None),
        };

        (status, Json(body)).into_response()
    }
}

/// Tags a store, storage or I/O failure with the operation it broke.
pub trait OrInternal<T> {
    fn or_internal(self, operation: &'static str) -> Result<T, AppError>;
}

impl<T, E> OrInternal<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn or_internal(self, operation: &'static str) -> Result<T, AppError> {
        self.map_err(|e| AppError::InternalError {
            operation,
            cause: e.to_string(),
        })
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::MalformedPayload(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::MalformedPayload(err.body_text())
    }
}
