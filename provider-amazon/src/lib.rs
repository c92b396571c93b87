//! # Amazon Photos Provider
//!
//! Imports photo albums and photos into Amazon Photos through the Amazon
//! Drive v1 API.
//!
//! ## Overview
//!
//! This module provides:
//! - Endpoint discovery and root folder lookup
//! - Album folders and `VISUAL_COLLECTION` albums, one pair per source album
//! - Photo uploads with MD5 integrity headers, read from the job store or the
//!   source URL
//! - Allowance-exceeded rejections reported as `PermissionDenied`

pub mod client;
pub mod error;
pub mod importer;
pub mod types;

pub use client::AmazonPhotosClient;
pub use error::{AmazonError, Result};
pub use importer::AmazonPhotosImporter;
