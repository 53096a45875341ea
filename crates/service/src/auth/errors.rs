use thiserror::Error;

use crate::errors::ErrorKind;

/// Failures of the password hasher.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("password must not be empty")]
    EmptyInput,
    #[error("hashing error: {0}")]
    Hashing(String),
}

/// Failures of token issuance and verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("signing key is not configured")]
    MissingSigningKey,
    #[error("token signing failed: {0}")]
    SigningFailure(String),
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization token is missing")]
    EmptyToken,
    #[error("invalid token")]
    InvalidToken(#[source] TokenError),
    #[error("credential rejected")]
    WeakOrEmptyCredential(#[source] HashError),
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::UserNotFound => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::WeakOrEmptyCredential(_) => 1005,
            AuthError::EmptyToken => 1101,
            AuthError::InvalidToken(_) => 1102,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmptyToken | AuthError::InvalidToken(_) => ErrorKind::Token,
            AuthError::WeakOrEmptyCredential(_) | AuthError::UserNotFound | AuthError::InvalidCredentials => {
                ErrorKind::Credential
            }
        }
    }
}
