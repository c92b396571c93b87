use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The grant was rejected or no refresh token exists. Needs re-authorization.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token refresh failed with status {status}: {body}")]
    TokenRefreshFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),

    #[error("Invalid credential configuration: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Whether the end user has to authorize again before any call can succeed.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, AuthError::InvalidToken(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
