//! Credential creation and OAuth 2.0 refresh.
//!
//! A [`CredentialManager`] owns the bearer credential for exactly one job.
//! Readers take the current access token under a read lock; refresh runs
//! under a dedicated mutex so concurrent 401s collapse into one token call.
//!
//! # Example
//!
//! ```no_run
//! use core_auth::{AppCredentials, CredentialManager, TokensAndUrlAuthData};
//! use std::sync::Arc;
//!
//! # async fn example() -> core_auth::Result<()> {
//! # use bridge_traits::http::HttpClient;
//! # let http_client: Arc<dyn HttpClient> = todo!();
//! let auth = TokensAndUrlAuthData::new(
//!     "access",
//!     Some("refresh".to_string()),
//!     "https://api.amazon.com/auth/o2/token",
//! );
//! let app = AppCredentials::new("client-id", "client-secret");
//!
//! let credential = CredentialManager::create_credential(&auth, &app);
//! let manager = CredentialManager::new(http_client, credential);
//!
//! let stale = manager.access_token().await;
//! let refreshed = manager.refresh(&stale).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{AuthError, Result};
use crate::types::{AppCredentials, Credential, TokensAndUrlAuthData};
use bridge_traits::http::{HttpClient, HttpRequest};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

const INVALID_GRANT: &str = "invalid_grant";

/// Successful token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Error body returned by a token endpoint.
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Owns and refreshes one job's credential.
pub struct CredentialManager {
    http_client: Arc<dyn HttpClient>,
    credential: RwLock<Credential>,
    refresh_lock: Mutex<()>,
}

impl CredentialManager {
    /// Build the in-memory credential. Never touches the network.
    pub fn create_credential(auth: &TokensAndUrlAuthData, app: &AppCredentials) -> Credential {
        Self::create_credential_with_token_url(auth, app, auth.token_server_url.clone())
    }

    /// Build a credential whose token endpoint does not come from the auth data.
    pub fn create_credential_with_token_url(
        auth: &TokensAndUrlAuthData,
        app: &AppCredentials,
        token_url: impl Into<String>,
    ) -> Credential {
        Credential {
            access_token: auth.access_token.clone(),
            refresh_token: auth.refresh_token.clone(),
            token_server_url: token_url.into(),
            client_id: app.key.clone(),
            client_secret: app.secret.clone(),
        }
    }

    pub fn new(http_client: Arc<dyn HttpClient>, credential: Credential) -> Self {
        Self {
            http_client,
            credential: RwLock::new(credential),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Current access token. Waits out an in-progress refresh.
    pub async fn access_token(&self) -> String {
        self.credential.read().await.access_token.clone()
    }

    /// Snapshot of the current credential.
    pub async fn credential(&self) -> Credential {
        self.credential.read().await.clone()
    }

    /// Refresh the shared credential after `stale_token` was rejected.
    ///
    /// If another caller already replaced `stale_token`, the current
    /// credential is returned without a second token call.
    #[instrument(skip(self, stale_token))]
    pub async fn refresh(&self, stale_token: &str) -> Result<Credential> {
        let _guard = self.refresh_lock.lock().await;

        if self.credential.read().await.access_token != stale_token {
            debug!("Token already refreshed by a concurrent request");
            return Ok(self.credential.read().await.clone());
        }

        // Readers block on this guard until the token call settles.
        let mut credential = self.credential.write().await;
        let refreshed = self.refresh_credential(&credential).await?;
        *credential = refreshed.clone();

        Ok(refreshed)
    }

    /// Post a refresh-token grant and return the updated credential.
    ///
    /// A rejected grant (`invalid_grant`) or a missing refresh token is
    /// [`AuthError::InvalidToken`]. Transport failures are
    /// [`AuthError::NetworkError`]; any other error response is
    /// [`AuthError::TokenRefreshFailed`].
    #[instrument(skip(self, credential), fields(token_url = %credential.token_server_url))]
    pub async fn refresh_credential(&self, credential: &Credential) -> Result<Credential> {
        let refresh_token = match credential.refresh_token.as_deref() {
            Some(token) if !token.trim().is_empty() => token,
            _ => {
                warn!("No refresh token available");
                return Err(AuthError::InvalidToken(
                    "Unable to refresh token: no refresh token".to_string(),
                ));
            }
        };

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.as_str()),
        ];

        let request = HttpRequest::post(credential.token_server_url.clone())
            .form(&params)
            .map_err(|e| AuthError::Configuration(e.to_string()))?;

        debug!("Attempting to refresh authorization token");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| AuthError::NetworkError(e.to_string()))?;

        if response.is_success() {
            let token: TokenResponse = response
                .json()
                .map_err(|e| AuthError::ParseError(e.to_string()))?;

            info!(
                expires_in = token.expires_in.unwrap_or_default(),
                rotated = token.refresh_token.is_some(),
                "Successfully refreshed token"
            );

            return Ok(Credential {
                access_token: token.access_token,
                refresh_token: token
                    .refresh_token
                    .or_else(|| credential.refresh_token.clone()),
                ..credential.clone()
            });
        }

        let status = response.status;
        let body = response.text_lossy();

        match response.json::<TokenErrorResponse>() {
            Ok(error) if error.error == INVALID_GRANT => {
                warn!(status, "Refresh grant rejected");
                Err(AuthError::InvalidToken(format!(
                    "Unable to refresh token: {}",
                    error.error_description.unwrap_or(error.error)
                )))
            }
            Ok(error) => {
                warn!(status, error = %error.error, "Error while refreshing token");
                Err(AuthError::TokenRefreshFailed { status, body })
            }
            Err(_) => {
                warn!(status, "Error while refreshing token");
                Err(AuthError::TokenRefreshFailed { status, body })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use bridge_traits::http::HttpResponse;
    use mockall::mock;
    use tokio::io::AsyncRead;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(&self, url: String) -> BridgeResult<Box<dyn AsyncRead + Send + Unpin>>;
        }
    }

    fn auth_data() -> TokensAndUrlAuthData {
        TokensAndUrlAuthData::new(
            "old-access",
            Some("refresh-1".to_string()),
            "https://auth.example.com/token",
        )
    }

    fn app() -> AppCredentials {
        AppCredentials::new("client-id", "client-secret")
    }

    fn manager_with(mock: MockHttpClient) -> CredentialManager {
        let credential = CredentialManager::create_credential(&auth_data(), &app());
        CredentialManager::new(Arc::new(mock), credential)
    }

    #[test]
    fn test_create_credential_copies_fields() {
        let credential = CredentialManager::create_credential(&auth_data(), &app());

        assert_eq!(credential.access_token, "old-access");
        assert_eq!(credential.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(credential.token_server_url, "https://auth.example.com/token");
        assert_eq!(credential.client_id, "client-id");
        assert_eq!(credential.client_secret, "client-secret");
    }

    #[test]
    fn test_create_credential_with_explicit_token_url() {
        let auth = TokensAndUrlAuthData::new("a", Some("r".to_string()), "site-42");
        let credential = CredentialManager::create_credential_with_token_url(
            &auth,
            &app(),
            "https://public-api.wordpress.com/oauth2/token",
        );

        assert_eq!(
            credential.token_server_url,
            "https://public-api.wordpress.com/oauth2/token"
        );
    }

    #[tokio::test]
    async fn test_refresh_posts_form_grant() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                let body = req
                    .body
                    .as_ref()
                    .map(|b| String::from_utf8_lossy(b).to_string())
                    .unwrap_or_default();
                req.url == "https://auth.example.com/token"
                    && body.contains("grant_type=refresh_token")
                    && body.contains("refresh_token=refresh-1")
                    && body.contains("client_id=client-id")
                    && body.contains("client_secret=client-secret")
                    && req.headers.get("Content-Type").map(String::as_str)
                        == Some("application/x-www-form-urlencoded")
            })
            .times(1)
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"access_token":"new-access","expires_in":3600}"#,
                ))
            });

        let manager = manager_with(mock);
        let refreshed = manager.refresh("old-access").await.unwrap();

        assert_eq!(refreshed.access_token, "new-access");
        assert_eq!(refreshed.refresh_token.as_deref(), Some("refresh-1"));
        assert_eq!(manager.access_token().await, "new-access");
    }

    #[tokio::test]
    async fn test_refresh_keeps_rotated_refresh_token() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse::new(
                200,
                r#"{"access_token":"new","refresh_token":"refresh-2"}"#,
            ))
        });

        let manager = manager_with(mock);
        let refreshed = manager.refresh("old-access").await.unwrap();

        assert_eq!(refreshed.refresh_token.as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn test_invalid_grant_is_invalid_token() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse::new(
                400,
                r#"{"error":"invalid_grant","error_description":"revoked"}"#,
            ))
        });

        let manager = manager_with(mock);
        let err = manager.refresh("old-access").await.unwrap_err();

        assert!(err.is_unrecoverable());
        assert_eq!(manager.access_token().await, "old-access");
    }

    #[tokio::test]
    async fn test_other_token_error_is_recoverable() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(503, "upstream unavailable")));

        let manager = manager_with(mock);
        let err = manager.refresh("old-access").await.unwrap_err();

        assert!(matches!(
            err,
            AuthError::TokenRefreshFailed { status: 503, .. }
        ));
        assert!(!err.is_unrecoverable());
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::Timeout("read timed out".to_string())));

        let manager = manager_with(mock);
        let err = manager.refresh("old-access").await.unwrap_err();

        assert!(matches!(err, AuthError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_missing_refresh_token_is_invalid_token() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(0);

        let auth = TokensAndUrlAuthData::new("a", None, "https://auth.example.com/token");
        let credential = CredentialManager::create_credential(&auth, &app());
        let manager = CredentialManager::new(Arc::new(mock), credential);

        let err = manager.refresh("a").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_stale_token_skips_network() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"access_token":"new-access"}"#)));

        let manager = manager_with(mock);
        manager.refresh("old-access").await.unwrap();

        // A second caller that saw the same stale token gets the new one for free.
        let again = manager.refresh("old-access").await.unwrap();
        assert_eq!(again.access_token, "new-access");
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_parse_error() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "not json")));

        let manager = manager_with(mock);
        let err = manager.refresh("old-access").await.unwrap_err();

        assert!(matches!(err, AuthError::ParseError(_)));
    }
}
