use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use burrow_core::{ErrorKind, ShortenerError};
use burrow_redirector::RedirectorError;
use thiserror::Error;
use tracing::{error, warn};

use crate::model::{ErrorBody, ErrorDetail};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Shortener(#[from] ShortenerError),
    #[error(transparent)]
    Redirector(#[from] RedirectorError),
    #[error("malformed request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// `None` for failures that have no domain kind.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Shortener(e) => Some(e.kind()),
            AppError::Redirector(e) => Some(e.kind()),
            AppError::BadRequest(_) => Some(ErrorKind::InvalidInput),
            AppError::Internal(_) => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            Some(ErrorKind::AliasTaken) => StatusCode::CONFLICT,
            Some(ErrorKind::GenerationExhausted) => StatusCode::SERVICE_UNAVAILABLE,
            Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
            Some(ErrorKind::InvalidInput) => StatusCode::BAD_REQUEST,
            Some(ErrorKind::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            Some(ErrorKind::StorageUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind().map_or("internal", |kind| kind.as_str());

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(kind, error = %self, "request failed");
        } else if status.is_server_error() {
            warn!(kind, error = %self, "request failed");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                kind: kind.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}
