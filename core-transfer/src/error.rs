use bridge_traits::BridgeError;
use core_auth::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Refresh failed or the grant was revoked. Fatal to the whole job.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Quota or ACL rejection of a single write.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Transient I/O error: {message}")]
    TransientIo {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No cached value for key {key}")]
    NotFound { key: String },
}

impl TransferError {
    pub fn transient(message: impl Into<String>) -> Self {
        TransferError::TransientIo {
            status: None,
            message: message.into(),
            body: None,
        }
    }

    /// Non-success HTTP response that carries no more specific meaning.
    pub fn bad_status(status: u16, body: impl Into<String>) -> Self {
        TransferError::TransientIo {
            status: Some(status),
            message: format!("Bad status code: {}", status),
            body: Some(body.into()),
        }
    }

    /// Whether no further authorized call in the job can succeed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransferError::InvalidToken(_))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::InvalidToken(_) => ErrorKind::InvalidToken,
            TransferError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            TransferError::TransientIo { .. } => ErrorKind::TransientIo,
            TransferError::Validation(_) => ErrorKind::Validation,
            TransferError::NotFound { .. } => ErrorKind::NotFound,
        }
    }
}

/// Error class without its payload, for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidToken,
    PermissionDenied,
    TransientIo,
    Validation,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidToken => "invalid_token",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::TransientIo => "transient_io",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AuthError> for TransferError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(message) => TransferError::InvalidToken(message),
            AuthError::TokenRefreshFailed { status, body } => TransferError::TransientIo {
                status: Some(status),
                message: "Token refresh failed".to_string(),
                body: Some(body),
            },
            other => TransferError::transient(other.to_string()),
        }
    }
}

impl From<BridgeError> for TransferError {
    fn from(err: BridgeError) -> Self {
        TransferError::transient(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
