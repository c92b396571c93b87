//! # Transfer Core
//!
//! Shared machinery every provider crate builds on.
//!
//! ## Overview
//!
//! - [`AuthorizedHttpClient`]: bearer-authorized calls, one refresh-and-retry
//!   on 401, failure classification
//! - [`IdempotentExecutor`]: record-once, single-flight execution of
//!   side-effecting item operations
//! - [`ResumableExporter`]: one page per call with an opaque continuation
//! - [`Exporter`] / [`Importer`]: what a provider exposes to an orchestrator
//! - [`JobReport`]: the user-visible outcome of a job pass
//!
//! The crate never spawns tasks or creates a runtime. Every operation is an
//! `async fn` driven by the caller's executor.

pub mod adapter;
pub mod client;
pub mod error;
pub mod export;
pub mod idempotent;
pub mod import;
pub mod job;
pub mod models;

pub use adapter::{DefaultErrorClassifier, ErrorClassifier, ItemTranslator, Page, PageSource};
pub use client::AuthorizedHttpClient;
pub use error::{ErrorKind, Result, TransferError};
pub use export::{ExportResult, ExportState, Exporter, PaginationToken, ResumableExporter};
pub use idempotent::{IdempotentExecutor, ItemFailure, Outcome};
pub use import::{ImportResult, Importer};
pub use job::{FailedItem, JobId, JobReport, JobStatus};
