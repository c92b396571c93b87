//! Amazon Drive API client
//!
//! Thin wrapper over [`AuthorizedHttpClient`] for the three calls the
//! importer needs: endpoint discovery, node creation and media upload.

use bridge_traits::http::HttpRequest;
use bytes::Bytes;
use core_auth::{AppCredentials, CredentialManager, TokensAndUrlAuthData};
use core_runtime::config::TransferConfig;
use core_transfer::{AuthorizedHttpClient, DefaultErrorClassifier};
use md5::{Digest, Md5};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::{debug, instrument};

use crate::error::{AmazonError, Result};
use crate::types::{EndPoint, Media, Node, NodeList};

/// Account endpoint discovery URL
pub const ACCOUNT_URL: &str = "https://drive.amazonaws.com/drive/v1/account/endpoint";

const NODE_RESOURCE: &str = "nodes";
const UPLOAD_RESOURCE: &str = "v2/upload";
const ROOT_NODE_FILTERS: &str = "kind:FOLDER and isRoot:true";

/// Body fragment of a 403 caused by the storage allowance
pub const QUOTA_MARKER: &str = "File size exceeds account allowance";

const ACCESS_TOKEN_HEADER: &str = "x-amz-access-token";
const FILE_MD5_HEADER: &str = "x-amz-file-md5";
const UPLOAD_READ_TIMEOUT: Duration = Duration::from_secs(2 * 60);

pub struct AmazonPhotosClient {
    client: Arc<AuthorizedHttpClient>,
}

impl AmazonPhotosClient {
    /// Wrap an authorized client, adding the Amazon token header and quota
    /// classification.
    pub fn new(client: AuthorizedHttpClient) -> Self {
        let client = client
            .with_token_header(ACCESS_TOKEN_HEADER)
            .with_classifier(Arc::new(
                DefaultErrorClassifier::new().with_quota_marker(QUOTA_MARKER),
            ));
        Self {
            client: Arc::new(client),
        }
    }

    /// Build a client for one user's authorization.
    pub fn connect(
        config: &TransferConfig,
        auth: &TokensAndUrlAuthData,
        app: &AppCredentials,
    ) -> Self {
        let credential = CredentialManager::create_credential(auth, app);
        let credentials = Arc::new(CredentialManager::new(config.http_client.clone(), credential));
        Self::new(AuthorizedHttpClient::from_config(config, credentials))
    }

    #[instrument(skip(self))]
    pub async fn get_endpoints(&self) -> Result<EndPoint> {
        Ok(self.client.execute_json(HttpRequest::get(ACCOUNT_URL)).await?)
    }

    /// The account's root folder.
    #[instrument(skip(self, endpoint))]
    pub async fn get_root_node(&self, endpoint: &EndPoint) -> Result<Node> {
        let url = with_params(&endpoint.metadata_url, &[("filters", ROOT_NODE_FILTERS)]);
        let nodes: NodeList = self.client.execute_json(HttpRequest::get(url)).await?;

        if nodes.count == 0 {
            return Err(AmazonError::RootNodeMissing);
        }
        nodes.data.into_iter().next().ok_or(AmazonError::RootNodeMissing)
    }

    /// Create `node` and return the id Amazon assigned to it.
    #[instrument(skip(self, endpoint, node), fields(name = ?node.name))]
    pub async fn create_node(&self, endpoint: &EndPoint, node: &Node) -> Result<String> {
        let url = format!("{}{}", endpoint.metadata_url, NODE_RESOURCE);
        let request = HttpRequest::post(url).json(node)?;
        let created: Node = self.client.execute_json(request).await?;

        debug!(id = ?created.id, "Created node");
        created.id.ok_or(AmazonError::MissingNodeId)
    }

    /// Upload `content` as a file named `title`, optionally into a folder.
    #[instrument(skip(self, endpoint, content), fields(size = content.len()))]
    pub async fn upload_media(
        &self,
        endpoint: &EndPoint,
        content: Bytes,
        title: &str,
        parent_node_id: Option<&str>,
    ) -> Result<Media> {
        if content.is_empty() {
            return Err(AmazonError::EmptyUpload {
                title: title.to_string(),
            });
        }

        let file_size = content.len().to_string();
        let mut params = vec![("name", title), ("fileSize", file_size.as_str())];
        if let Some(parent) = parent_node_id {
            params.push(("parentNodeId", parent));
        }

        let url = with_params(
            &format!("{}{}", endpoint.content_url, UPLOAD_RESOURCE),
            &params,
        );
        let request = HttpRequest::post(url)
            .header(FILE_MD5_HEADER, content_md5(&content))
            .timeout(UPLOAD_READ_TIMEOUT)
            .body(content);

        Ok(self.client.execute_json(request).await?)
    }

    /// Fetch public source media without the Amazon credential.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> Result<Bytes> {
        let mut stream = self
            .client
            .http_client()
            .download_stream(url.to_string())
            .await?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

/// Upper-case hex MD5 of `content`.
pub fn content_md5(content: &[u8]) -> String {
    hex::encode_upper(Md5::digest(content))
}

/// Append `params` sorted by name, with names and values trimmed.
fn with_params(url: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let mut sorted: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.trim(), v.trim())).collect();
    sorted.sort_by_key(|(k, _)| *k);

    let query = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", url, query)
}
