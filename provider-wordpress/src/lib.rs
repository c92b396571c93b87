//! # WordPress Provider
//!
//! Imports social activities as draft posts on a WordPress.com site.
//!
//! Video attachments are sideloaded by WordPress and then embedded with a
//! follow-up edit carrying `[wpvideo]` short codes.

pub mod client;
pub mod importer;
pub mod types;

pub use client::WordPressClient;
pub use importer::{PostTranslator, WordPressPostsImporter};
