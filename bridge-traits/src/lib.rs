//! # Host Bridge Traits
//!
//! Capability traits the transfer core requires from its host.
//!
//! ## Overview
//!
//! This crate defines the contract between the transfer core and
//! platform-specific implementations. The core never opens sockets or files
//! itself; it asks for a capability through one of these traits.
//!
//! ## Traits
//!
//! - [`HttpClient`](http::HttpClient) - Sends requests exactly once and returns
//!   every status code to the caller for classification
//! - [`JobStore`](storage::JobStore) - Job-scoped byte storage for payloads
//!   staged earlier in a transfer
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. A bridge
//! error always means the operation did not complete (transport failure,
//! missing object); HTTP status codes are never turned into bridge errors.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds so a single implementation
//! can be shared by every task of a job.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         todo!()
//!     }
//!
//!     async fn download_stream(&self, url: String) -> Result<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod storage;

pub use error::BridgeError;

pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use storage::JobStore;
