//! # Resumable Export
//!
//! One page per call, threaded through an opaque continuation token.
//!
//! ## State Machine
//!
//! ```text
//! Fetching ──(page with cursor)──→ Continue ──(page with cursor)──┐
//!    │                                │   ↑                       │
//!    │                                │   └───────────────────────┘
//!    └──(empty page / no cursor)──→ Done ←──(empty page / no cursor)
//! ```
//!
//! A fresh exporter accepts any token, which is how a new process resumes a
//! persisted job. Once it has issued a token it only accepts that token back.

use crate::adapter::PageSource;
use crate::client::AuthorizedHttpClient;
use crate::error::{Result, TransferError};
use crate::job::JobId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Opaque provider cursor handed back to the caller between pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaginationToken(String);

impl PaginationToken {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PaginationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one export call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "UPPERCASE")]
pub enum ExportResult<T> {
    Continue {
        payload: T,
        continuation: PaginationToken,
    },
    End {
        payload: T,
    },
}

impl<T> ExportResult<T> {
    pub fn payload(&self) -> &T {
        match self {
            ExportResult::Continue { payload, .. } | ExportResult::End { payload } => payload,
        }
    }

    pub fn into_payload(self) -> T {
        match self {
            ExportResult::Continue { payload, .. } | ExportResult::End { payload } => payload,
        }
    }

    pub fn continuation(&self) -> Option<&PaginationToken> {
        match self {
            ExportResult::Continue { continuation, .. } => Some(continuation),
            ExportResult::End { .. } => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, ExportResult::End { .. })
    }

    /// Transform the payload, keeping the tag and continuation.
    pub fn map<U, F>(self, f: F) -> ExportResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ExportResult::Continue {
                payload,
                continuation,
            } => ExportResult::Continue {
                payload: f(payload),
                continuation,
            },
            ExportResult::End { payload } => ExportResult::End {
                payload: f(payload),
            },
        }
    }
}

/// Where an exporter is in its page sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportState {
    Fetching,
    Continue,
    Done,
}

impl ExportState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExportState::Done)
    }
}

/// Export side of a provider, generic over the container it produces.
#[async_trait]
pub trait Exporter<T>: Send + Sync {
    /// Fetch the next page of `job_id`'s data.
    async fn export(
        &self,
        job_id: &JobId,
        token: Option<&PaginationToken>,
    ) -> Result<ExportResult<T>>;
}

struct Progress {
    state: ExportState,
    issued: Option<PaginationToken>,
}

/// Drives a [`PageSource`] one page per call.
pub struct ResumableExporter<S: PageSource> {
    source: S,
    client: Arc<AuthorizedHttpClient>,
    progress: Mutex<Progress>,
}

impl<S: PageSource> ResumableExporter<S> {
    pub fn new(source: S, client: Arc<AuthorizedHttpClient>) -> Self {
        Self {
            source,
            client,
            progress: Mutex::new(Progress {
                state: ExportState::Fetching,
                issued: None,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn state(&self) -> ExportState {
        self.progress.lock().await.state
    }

    /// Fetch exactly one page.
    ///
    /// # Errors
    ///
    /// - `Validation` when called after `END`, or in `CONTINUE` with a token
    ///   other than the one last issued
    /// - whatever the fetch itself fails with; the state is left unchanged so
    ///   the same token can be retried
    #[instrument(skip(self, token), fields(job_id = %job_id))]
    pub async fn export(
        &self,
        job_id: &JobId,
        token: Option<&PaginationToken>,
    ) -> Result<ExportResult<Vec<S::Item>>> {
        let mut progress = self.progress.lock().await;

        match progress.state {
            ExportState::Done => {
                return Err(TransferError::Validation(
                    "Export already finished".to_string(),
                ));
            }
            ExportState::Continue if progress.issued.as_ref() != token => {
                return Err(TransferError::Validation(
                    "Continuation token does not match the last page".to_string(),
                ));
            }
            _ => {}
        }

        let request = self.source.page_request(token.map(PaginationToken::as_str))?;
        let response = self.client.execute(request).await?;
        let page = self.source.parse_page(&response)?;

        if page.items.is_empty() {
            info!("No more items to export");
            progress.state = ExportState::Done;
            progress.issued = None;
            return Ok(ExportResult::End {
                payload: page.items,
            });
        }

        match page.continuation().map(PaginationToken::new) {
            Some(continuation) => {
                debug!(items = page.items.len(), "Continuing to fetch");
                progress.state = ExportState::Continue;
                progress.issued = Some(continuation.clone());
                Ok(ExportResult::Continue {
                    payload: page.items,
                    continuation,
                })
            }
            None => {
                info!(items = page.items.len(), "Last page exported");
                progress.state = ExportState::Done;
                progress.issued = None;
                Ok(ExportResult::End {
                    payload: page.items,
                })
            }
        }
    }
}
