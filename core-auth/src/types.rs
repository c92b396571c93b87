use serde::{Deserialize, Serialize};
use std::fmt;

/// Client id and secret registered with a service.
///
/// # Examples
///
/// ```
/// use core_auth::AppCredentials;
///
/// let app = AppCredentials::new("client-id", "client-secret");
/// assert_eq!(app.key, "client-id");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    pub key: String,
    pub secret: String,
}

impl AppCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Auth data handed over when a user authorizes a job.
///
/// `token_server_url` normally names the token endpoint. Some services reuse
/// the slot for another account-scoped value (WordPress keeps the site id
/// there).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensAndUrlAuthData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(rename = "tokenServerEncodedUrl")]
    pub token_server_url: String,
}

impl TokensAndUrlAuthData {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        token_server_url: impl Into<String>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            token_server_url: token_server_url.into(),
        }
    }
}

impl fmt::Debug for TokensAndUrlAuthData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokensAndUrlAuthData")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_server_url", &self.token_server_url)
            .finish()
    }
}

/// The bearer credential for one job.
///
/// Expiry is not tracked: every credential is eligible for refresh as soon as
/// a provider answers 401.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_server_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credential {
    /// Whether a refresh grant can be attempted at all.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("token_server_url", &self.token_server_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}
