//! # Transfer Configuration
//!
//! Builder-based configuration shared by every transfer job.
//!
//! ## Overview
//!
//! `TransferConfig` carries the injected bridges (HTTP client, job store) and
//! the transport settings providers need. Validation is fail-fast: building a
//! config without an HTTP client is an error unless the `desktop-shims`
//! feature supplies the reqwest-backed default.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::TransferConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = TransferConfig::builder()
//!     .http_client(Arc::new(MyHttpClient))
//!     .read_timeout(Duration::from_secs(60))
//!     .build()?;
//! # Ok::<(), core_runtime::Error>(())
//! ```

use crate::error::{Error, Result};
use bridge_traits::{HttpClient, JobStore};
use std::sync::Arc;
use std::time::Duration;

pub use bridge_traits::http::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT, DEFAULT_USER_AGENT};

/// Configuration shared by exporters, importers and the credential layer.
#[derive(Clone)]
pub struct TransferConfig {
    /// HTTP transport used for every provider and token call
    pub http_client: Arc<dyn HttpClient>,

    /// Staging area for payloads that must outlive a single call (optional)
    pub job_store: Option<Arc<dyn JobStore>>,

    /// Per-request read timeout
    pub read_timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl std::fmt::Debug for TransferConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferConfig")
            .field("http_client", &"HttpClient { ... }")
            .field(
                "job_store",
                &self.job_store.as_ref().map(|_| "JobStore { ... }"),
            )
            .field("read_timeout", &self.read_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl TransferConfig {
    /// Creates a new builder for constructing a `TransferConfig`.
    pub fn builder() -> TransferConfigBuilder {
        TransferConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.read_timeout.is_zero() {
            return Err(Error::Config(
                "Read timeout must be greater than zero".to_string(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(Error::Config(
                "Connect timeout must be greater than zero".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(Error::Config("User agent cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Returns the job store, or `CapabilityMissing` if none was configured.
    pub fn require_job_store(&self) -> Result<Arc<dyn JobStore>> {
        self.job_store.clone().ok_or_else(|| Error::CapabilityMissing {
            capability: "JobStore".to_string(),
            message: "A JobStore is required to stage payloads between calls. \
                     Inject one with .job_store() or enable the 'desktop-shims' feature."
                .to_string(),
        })
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(
    read_timeout: Duration,
    connect_timeout: Duration,
    user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeouts(
        read_timeout,
        connect_timeout,
        user_agent,
    ));
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(
    _read_timeout: Duration,
    _connect_timeout: Duration,
    _user_agent: &str,
) -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for provider calls. \
                 Desktop: enable the 'desktop-shims' feature to use the default reqwest client. \
                 Other hosts: inject a platform HTTP client with .http_client()."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_job_store() -> Option<Arc<dyn JobStore>> {
    let store: Arc<dyn JobStore> = Arc::new(bridge_desktop::FsJobStore::in_temp_dir());
    Some(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_job_store() -> Option<Arc<dyn JobStore>> {
    None
}

/// Builder for `TransferConfig`.
#[derive(Default)]
pub struct TransferConfigBuilder {
    http_client: Option<Arc<dyn HttpClient>>,
    job_store: Option<Arc<dyn JobStore>>,
    read_timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl TransferConfigBuilder {
    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the job store used for staging payloads.
    pub fn job_store(mut self, store: Arc<dyn JobStore>) -> Self {
        self.job_store = Some(store);
        self
    }

    /// Sets the read timeout (default: 120 seconds).
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout (default: 10 seconds).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the final `TransferConfig` instance.
    ///
    /// Returns `CapabilityMissing` when no HTTP client was injected and no
    /// platform default is compiled in, or `Config` for invalid values.
    pub fn build(self) -> Result<TransferConfig> {
        let read_timeout = self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT);
        let connect_timeout = self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(read_timeout, connect_timeout, &user_agent)?,
        };

        let config = TransferConfig {
            http_client,
            job_store: self.job_store.or_else(provide_default_job_store),
            read_timeout,
            connect_timeout,
            user_agent,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{BridgeError, HttpRequest, HttpResponse};
    use tokio::io::AsyncRead;

    struct MockHttpClient;

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn execute(
            &self,
            _request: HttpRequest,
        ) -> std::result::Result<HttpResponse, BridgeError> {
            Ok(HttpResponse::new(200, "{}"))
        }

        async fn download_stream(
            &self,
            _url: String,
        ) -> std::result::Result<Box<dyn AsyncRead + Send + Unpin>, BridgeError> {
            Err(BridgeError::NotAvailable("download".to_string()))
        }
    }

    fn builder_with_client() -> TransferConfigBuilder {
        TransferConfig::builder().http_client(Arc::new(MockHttpClient))
    }

    #[test]
    fn test_builder_applies_defaults() {
        let config = builder_with_client().build().unwrap();

        assert_eq!(config.read_timeout, DEFAULT_READ_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(config.user_agent.starts_with("transfer-core/"));
    }

    #[test]
    fn test_builder_with_custom_timeouts() {
        let config = builder_with_client()
            .read_timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(2))
            .user_agent("tests/1.0")
            .build()
            .unwrap();

        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert_eq!(config.user_agent, "tests/1.0");
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_http_client() {
        let result = TransferConfig::builder().build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "HttpClient");
            }
            other => panic!("expected CapabilityMissing, got {:?}", other),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_require_job_store_without_store() {
        let config = builder_with_client().build().unwrap();
        assert!(matches!(
            config.require_job_store(),
            Err(Error::CapabilityMissing { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_read_timeout() {
        let result = builder_with_client().read_timeout(Duration::ZERO).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_user_agent() {
        let result = builder_with_client().user_agent("  ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = builder_with_client().build().unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("HttpClient { ... }"));
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = builder_with_client().build().unwrap();
        let cloned = config.clone();
        assert!(Arc::ptr_eq(&config.http_client, &cloned.http_client));
    }
}
