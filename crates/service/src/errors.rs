use models::errors::ModelError;
use thiserror::Error;

use crate::auth::errors::{AuthError, TokenError};

/// Coarse classification used by the HTTP layer to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Credential,
    Token,
    NotFound,
    Conflict,
    Persistence,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("token could not be issued")]
    TokenIssue(#[source] TokenError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("user persistence failed")]
    PersistenceFailure(#[source] ModelError),
    #[error("country persistence failed")]
    CountryPersistenceFailure(#[source] ModelError),
    #[error("company persistence failed")]
    CompanyPersistenceFailure(#[source] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Lift a model error, keeping validation, missing rows and unique-key
    /// clashes distinguishable. Everything else becomes `persistence(err)`.
    pub(crate) fn from_model(err: ModelError, persistence: fn(ModelError) -> ServiceError) -> Self {
        match err {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::NotFound(msg) => Self::NotFound(msg),
            ModelError::Conflict(msg) => Self::Conflict(msg),
            other => persistence(other),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Auth(e) => e.kind(),
            // a token we fail to sign is a server-side fault, never a caller one
            Self::TokenIssue(_) => ErrorKind::Configuration,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::PersistenceFailure(_)
            | Self::CountryPersistenceFailure(_)
            | Self::CompanyPersistenceFailure(_) => ErrorKind::Persistence,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation(_) => 1001,
            Self::Conflict(_) => 1002,
            Self::NotFound(_) => 1003,
            Self::Auth(e) => e.code(),
            Self::TokenIssue(_) => 1103,
            Self::PersistenceFailure(_) => 1200,
            Self::CountryPersistenceFailure(_) => 1201,
            Self::CompanyPersistenceFailure(_) => 1202,
        }
    }
}
