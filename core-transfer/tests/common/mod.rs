//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_auth::{AppCredentials, CredentialManager, TokensAndUrlAuthData};
use core_transfer::AuthorizedHttpClient;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncRead;

pub const TOKEN_URL: &str = "https://auth.example.com/token";

type Handler = dyn Fn(&HttpRequest) -> BridgeResult<HttpResponse> + Send + Sync;

/// HttpClient stub that answers through a closure and records every request.
pub struct ScriptedHttpClient {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedHttpClient {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> BridgeResult<HttpResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleep before answering, so concurrent callers overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&HttpRequest) -> bool) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| predicate(r))
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.handler)(&request)
    }

    async fn download_stream(
        &self,
        _url: String,
    ) -> BridgeResult<Box<dyn AsyncRead + Send + Unpin>> {
        Err(BridgeError::NotAvailable("download".to_string()))
    }
}

pub fn bearer(request: &HttpRequest) -> Option<&str> {
    request
        .headers
        .get("Authorization")
        .and_then(|v| v.strip_prefix("Bearer "))
}

pub fn is_token_call(request: &HttpRequest) -> bool {
    request.url == TOKEN_URL
}

pub fn json(status: u16, body: &str) -> BridgeResult<HttpResponse> {
    Ok(HttpResponse::new(status, body.to_string()))
}

/// Authorized client whose credential starts with `access_token`.
pub fn authorized_client(
    http: Arc<ScriptedHttpClient>,
    access_token: &str,
) -> Arc<AuthorizedHttpClient> {
    authorized_client_with(http, access_token, |client| client)
}

/// Like [`authorized_client`], with extra configuration applied.
pub fn authorized_client_with(
    http: Arc<ScriptedHttpClient>,
    access_token: &str,
    configure: impl FnOnce(AuthorizedHttpClient) -> AuthorizedHttpClient,
) -> Arc<AuthorizedHttpClient> {
    let auth = TokensAndUrlAuthData::new(access_token, Some("refresh".to_string()), TOKEN_URL);
    let credential =
        CredentialManager::create_credential(&auth, &AppCredentials::new("id", "secret"));
    let credentials = Arc::new(CredentialManager::new(http.clone(), credential));
    Arc::new(configure(AuthorizedHttpClient::new(http, credentials)))
}
