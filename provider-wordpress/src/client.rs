//! WordPress.com REST client

use bridge_traits::http::HttpRequest;
use core_auth::{AppCredentials, CredentialManager, TokensAndUrlAuthData};
use core_runtime::config::TransferConfig;
use core_transfer::{AuthorizedHttpClient, Result};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::types::{Post, PostRequest};

pub const WORDPRESS_BASE_URL: &str = "https://public-api.wordpress.com/rest/v1.2";

/// Token endpoint. The auth data's token URL slot carries the site id instead.
pub const TOKEN_SERVER_URL: &str = "https://public-api.wordpress.com/oauth2/token";

pub struct WordPressClient {
    client: Arc<AuthorizedHttpClient>,
    base_url: String,
}

impl WordPressClient {
    pub fn new(client: Arc<AuthorizedHttpClient>) -> Self {
        Self::with_base_url(client, WORDPRESS_BASE_URL)
    }

    pub fn with_base_url(client: Arc<AuthorizedHttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Build a client for one user's authorization.
    pub fn connect(
        config: &TransferConfig,
        auth: &TokensAndUrlAuthData,
        app: &AppCredentials,
    ) -> Self {
        let credential =
            CredentialManager::create_credential_with_token_url(auth, app, TOKEN_SERVER_URL);
        let credentials = Arc::new(CredentialManager::new(config.http_client.clone(), credential));
        Self::new(Arc::new(AuthorizedHttpClient::from_config(config, credentials)))
    }

    #[instrument(skip(self, post))]
    pub async fn create_post(&self, site_id: &str, post: &PostRequest) -> Result<Post> {
        let url = format!(
            "{}/sites/{}/posts/new/",
            self.base_url,
            urlencoding::encode(site_id)
        );
        self.send(url, post).await
    }

    #[instrument(skip(self, post))]
    pub async fn edit_post(&self, site_id: &str, post_id: u64, post: &PostRequest) -> Result<Post> {
        let url = format!(
            "{}/sites/{}/posts/{}",
            self.base_url,
            urlencoding::encode(site_id),
            post_id
        );
        self.send(url, post).await
    }

    async fn send(&self, url: String, post: &PostRequest) -> Result<Post> {
        let request = HttpRequest::post(url).json(post)?;
        let saved: Post = self.client.execute_json(request).await?;
        debug!(post_id = saved.id, "Saved post");
        Ok(saved)
    }
}
