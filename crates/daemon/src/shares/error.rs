use common::crypto::TokenError;

use crate::access::AccessError;
use crate::directory::DirectoryError;
use crate::mail::MailError;

/// Errors surfaced by share operations
///
/// Every way a login can be refused (unknown share, outside its window,
/// quota spent, wrong or missing password) is `InvalidCredentials`, so a
/// caller cannot tell which check failed.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("forbidden")]
    Forbidden,
    #[error("share not found")]
    NotFound,
    #[error("invalid request: {0}")]
    Invalid(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("failed to sign access token: {0}")]
    Signing(#[from] TokenError),
}

impl From<sqlx::Error> for ShareError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("share storage error: {}", e);
        ShareError::Unavailable(format!("storage error: {}", e))
    }
}

impl From<MailError> for ShareError {
    fn from(e: MailError) -> Self {
        ShareError::Unavailable(e.to_string())
    }
}

impl From<DirectoryError> for ShareError {
    fn from(e: DirectoryError) -> Self {
        ShareError::Unavailable(e.to_string())
    }
}

impl From<AccessError> for ShareError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Forbidden { .. } => ShareError::Forbidden,
            AccessError::Unavailable(msg) => ShareError::Unavailable(msg),
        }
    }
}

impl From<tokio::task::JoinError> for ShareError {
    fn from(e: tokio::task::JoinError) -> Self {
        tracing::error!("password worker failed: {}", e);
        ShareError::Unavailable("password worker failed".to_string())
    }
}
