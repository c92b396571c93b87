//! Authorized HTTP calls with a single refresh-and-retry on 401.

use crate::adapter::{DefaultErrorClassifier, ErrorClassifier};
use crate::error::{Result, TransferError};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_auth::CredentialManager;
use core_runtime::config::{TransferConfig, DEFAULT_READ_TIMEOUT};
use core_runtime::logging::strip_query;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const UNAUTHORIZED: u16 = 401;

/// Sends requests with the job's bearer credential and classifies failures.
///
/// Every request is sent at most twice: once, and once more after a token
/// refresh if the first attempt came back 401.
pub struct AuthorizedHttpClient {
    http_client: Arc<dyn HttpClient>,
    credentials: Arc<CredentialManager>,
    token_headers: Vec<String>,
    read_timeout: Duration,
    classifier: Arc<dyn ErrorClassifier>,
}

impl AuthorizedHttpClient {
    pub fn new(http_client: Arc<dyn HttpClient>, credentials: Arc<CredentialManager>) -> Self {
        Self {
            http_client,
            credentials,
            token_headers: Vec::new(),
            read_timeout: DEFAULT_READ_TIMEOUT,
            classifier: Arc::new(DefaultErrorClassifier::new()),
        }
    }

    /// Build from shared configuration, taking its transport and read timeout.
    pub fn from_config(config: &TransferConfig, credentials: Arc<CredentialManager>) -> Self {
        Self::new(config.http_client.clone(), credentials).with_read_timeout(config.read_timeout)
    }

    /// Also send the access token in `name` (e.g. `x-amz-access-token`).
    pub fn with_token_header(mut self, name: impl Into<String>) -> Self {
        self.token_headers.push(name.into());
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn credentials(&self) -> &Arc<CredentialManager> {
        &self.credentials
    }

    /// Unauthenticated transport, for public source media.
    pub fn http_client(&self) -> &Arc<dyn HttpClient> {
        &self.http_client
    }

    /// Execute `request` and return the successful response.
    ///
    /// Fails with `InvalidToken` when the refresh is rejected or the retry is
    /// still unauthorized, `PermissionDenied` when the classifier says so for
    /// a write, and `TransientIo` otherwise.
    #[instrument(skip(self, request), fields(method = %request.method, url = %strip_query(&request.url)))]
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let token = self.credentials.access_token().await;
        let response = self.send(&request, &token).await?;

        if response.status != UNAUTHORIZED {
            return self.check(&request, response);
        }

        info!("Attempting to refresh authorization token");
        let refreshed = match self.credentials.refresh(&token).await {
            Ok(credential) => credential,
            Err(e) => {
                if e.is_unrecoverable() {
                    error!(error = %e, "Token refresh rejected");
                } else {
                    warn!(error = %e, "Token refresh failed");
                }
                return Err(e.into());
            }
        };
        info!("Refreshed authorization token successfully");

        let response = self.send(&request, &refreshed.access_token).await?;
        if response.status == UNAUTHORIZED {
            error!("Request still unauthorized after token refresh");
            return Err(TransferError::InvalidToken(
                "Unauthorized after token refresh".to_string(),
            ));
        }

        self.check(&request, response)
    }

    /// Execute and deserialize the success body. A malformed body is transient.
    pub async fn execute_json<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        let response = self.execute(request).await?;
        response.json().map_err(|e| TransferError::TransientIo {
            status: Some(response.status),
            message: format!("Unexpected response body: {}", e),
            body: Some(response.text_lossy()),
        })
    }

    async fn send(&self, request: &HttpRequest, access_token: &str) -> Result<HttpResponse> {
        let mut authorized = request.clone().bearer_token(access_token);
        for name in &self.token_headers {
            authorized = authorized.header(name.clone(), access_token);
        }
        if authorized.timeout.is_none() {
            authorized = authorized.timeout(self.read_timeout);
        }

        let response = self.http_client.execute(authorized).await?;
        debug!(status = response.status, "Received response");
        Ok(response)
    }

    fn check(&self, request: &HttpRequest, response: HttpResponse) -> Result<HttpResponse> {
        if response.is_success() {
            return Ok(response);
        }

        let body = response.text_lossy();
        let err = if request.method.is_write() {
            self.classifier.classify_write_error(response.status, &body)
        } else {
            TransferError::bad_status(response.status, body)
        };

        match &err {
            TransferError::PermissionDenied(reason) => {
                warn!(status = response.status, reason = %reason, "Permission denied")
            }
            _ => warn!(status = response.status, "Request failed"),
        }
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};
    use core_auth::{AppCredentials, TokensAndUrlAuthData};
    use mockall::{mock, Sequence};
    use tokio::io::AsyncRead;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
            async fn download_stream(&self, url: String) -> BridgeResult<Box<dyn AsyncRead + Send + Unpin>>;
        }
    }

    const TOKEN_URL: &str = "https://auth.example.com/token";

    fn client_for(mock: MockHttpClient) -> AuthorizedHttpClient {
        let http: Arc<dyn HttpClient> = Arc::new(mock);
        let auth = TokensAndUrlAuthData::new("old", Some("refresh".to_string()), TOKEN_URL);
        let credential =
            CredentialManager::create_credential(&auth, &AppCredentials::new("id", "secret"));
        let credentials = Arc::new(CredentialManager::new(http.clone(), credential));
        AuthorizedHttpClient::new(http, credentials)
    }

    fn bearer(req: &HttpRequest) -> Option<&str> {
        req.headers.get("Authorization").map(String::as_str)
    }

    #[tokio::test]
    async fn test_attaches_bearer_and_token_headers() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| {
                bearer(req) == Some("Bearer old")
                    && req.headers.get("x-amz-access-token").map(String::as_str) == Some("old")
                    && req.timeout == Some(DEFAULT_READ_TIMEOUT)
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));

        let client = client_for(mock).with_token_header("x-amz-access-token");
        client
            .execute(HttpRequest::get("https://api.example.com/items"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_keeps_explicit_request_timeout() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.timeout == Some(Duration::from_secs(5)))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(204, "")));

        let client = client_for(mock);
        let request = HttpRequest::get("https://api.example.com/items").timeout(Duration::from_secs(5));
        client.execute(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_unauthorized_refreshes_and_retries_once() {
        let mut mock = MockHttpClient::new();
        let mut seq = Sequence::new();

        mock.expect_execute()
            .withf(|req| bearer(req) == Some("Bearer old"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(401, "expired")));
        mock.expect_execute()
            .withf(|req| req.url == TOKEN_URL)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"access_token":"new"}"#)));
        mock.expect_execute()
            .withf(|req| bearer(req) == Some("Bearer new"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"id":"7"}"#)));

        let client = client_for(mock);
        let value: serde_json::Value = client
            .execute_json(HttpRequest::get("https://api.example.com/items/7"))
            .await
            .unwrap();

        assert_eq!(value["id"], "7");
        assert_eq!(client.credentials().access_token().await, "new");
    }

    #[tokio::test]
    async fn test_second_unauthorized_is_invalid_token() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url != TOKEN_URL)
            .times(2)
            .returning(|_| Ok(HttpResponse::new(401, "nope")));
        mock.expect_execute()
            .withf(|req| req.url == TOKEN_URL)
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"access_token":"new"}"#)));

        let client = client_for(mock);
        let err = client
            .execute(HttpRequest::get("https://api.example.com/items"))
            .await
            .unwrap_err();

        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_rejected_grant_is_invalid_token() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url != TOKEN_URL)
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "expired")));
        mock.expect_execute()
            .withf(|req| req.url == TOKEN_URL)
            .times(1)
            .returning(|_| Ok(HttpResponse::new(400, r#"{"error":"invalid_grant"}"#)));

        let client = client_for(mock);
        let err = client
            .execute(HttpRequest::get("https://api.example.com/items"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_failed_refresh_on_server_error_is_transient() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .withf(|req| req.url != TOKEN_URL)
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "expired")));
        mock.expect_execute()
            .withf(|req| req.url == TOKEN_URL)
            .times(1)
            .returning(|_| Ok(HttpResponse::new(500, "oops")));

        let client = client_for(mock);
        let err = client
            .execute(HttpRequest::get("https://api.example.com/items"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransferError::TransientIo {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_write_quota_is_permission_denied() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse::new(
                403,
                r#"{"message":"File size exceeds account allowance"}"#,
            ))
        });

        let classifier =
            DefaultErrorClassifier::new().with_quota_marker("File size exceeds account allowance");
        let client = client_for(mock).with_classifier(Arc::new(classifier));

        let err = client
            .execute(HttpRequest::post("https://api.example.com/nodes"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_read_403_is_transient_with_body() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(403, "File size exceeds account allowance")));

        let classifier =
            DefaultErrorClassifier::new().with_quota_marker("File size exceeds account allowance");
        let client = client_for(mock).with_classifier(Arc::new(classifier));

        let err = client
            .execute(HttpRequest::get("https://api.example.com/nodes"))
            .await
            .unwrap_err();

        match err {
            TransferError::TransientIo { status, body, .. } => {
                assert_eq!(status, Some(403));
                assert!(body.unwrap().contains("allowance"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_is_transient() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("connection reset".to_string())));

        let client = client_for(mock);
        let err = client
            .execute(HttpRequest::get("https://api.example.com/items"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::TransientIo { status: None, .. }));
    }

    #[tokio::test]
    async fn test_malformed_json_is_transient() {
        let mut mock = MockHttpClient::new();
        mock.expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "<html>")));

        let client = client_for(mock);
        let result: Result<serde_json::Value> = client
            .execute_json(HttpRequest::get("https://api.example.com/items"))
            .await;

        assert!(matches!(
            result,
            Err(TransferError::TransientIo {
                status: Some(200),
                ..
            })
        ));
    }
}
