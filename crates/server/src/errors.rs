use std::error::Error as _;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::auth::errors::AuthError;
use service::errors::{ErrorKind, ServiceError};
use thiserror::Error;
use tracing::{debug, error};

/// Code shared by every 401 so callers cannot tell credential and token
/// failures apart.
pub const UNAUTHORIZED_CODE: u16 = 1004;
pub const BAD_REQUEST_CODE: u16 = 1000;

/// JSON error response `{code, error}`.
#[derive(Debug)]
pub struct JsonApiError {
    status: StatusCode,
    code: u16,
    message: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, code: u16, message: impl Into<String>) -> Self {
        Self { status, code, message: message.into() }
    }

    pub fn unauthorized() -> Self { Self::new(StatusCode::UNAUTHORIZED, UNAUTHORIZED_CODE, "unauthorized") }

    pub fn forbidden() -> Self { Self::new(StatusCode::FORBIDDEN, 1300, "origin not allowed") }

    pub fn status(&self) -> StatusCode { self.status }
}

impl From<ServiceError> for JsonApiError {
    fn from(err: ServiceError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::new(StatusCode::BAD_REQUEST, err.code(), err.to_string()),
            ErrorKind::Credential | ErrorKind::Token => {
                debug!(error = %err, cause = ?err.source(), code = err.code(), "request unauthorized");
                Self::unauthorized()
            }
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, err.code(), err.to_string()),
            ErrorKind::Conflict => Self::new(StatusCode::CONFLICT, err.code(), err.to_string()),
            ErrorKind::Persistence | ErrorKind::Configuration => {
                error!(error = %err, cause = ?err.source(), code = err.code(), "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.code(), "internal server error")
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(err: AuthError) -> Self { ServiceError::from(err).into() }
}

impl From<JsonRejection> for JsonApiError {
    fn from(rej: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, BAD_REQUEST_CODE, rej.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(rej: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, BAD_REQUEST_CODE, rej.body_text())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { code: self.code, error: self.message })).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("signing key rejected: {0}")]
    SigningKey(#[source] service::auth::errors::TokenError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
