//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` (rustls, pooled connections, 2 minute read
//!   timeout by default)
//! - `JobStore` using `tokio::fs`, one directory per job
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{FsJobStore, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = Arc::new(ReqwestHttpClient::new());
//!     let job_store = Arc::new(FsJobStore::in_temp_dir());
//!
//!     // Hand both to TransferConfig::builder()
//! }
//! ```

mod http;
mod job_store;

pub use http::ReqwestHttpClient;
pub use job_store::FsJobStore;
