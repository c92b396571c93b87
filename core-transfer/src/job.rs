//! # Transfer Jobs
//!
//! Job identity, idempotency key construction and the end-of-job report.

use crate::error::{ErrorKind, Result, TransferError};
use crate::idempotent::IdempotentExecutor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for a transfer job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new random job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a job ID from a string
    ///
    /// # Errors
    ///
    /// Returns a validation error if the string is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self> {
        Ok(Self(Uuid::parse_str(s).map_err(|e| {
            TransferError::Validation(format!("Invalid job ID: {}", e))
        })?))
    }

    /// Deterministic idempotency key for an item of this job.
    ///
    /// ```
    /// use core_transfer::JobId;
    ///
    /// let job = JobId::from_string("550e8400-e29b-41d4-a716-446655440000").unwrap();
    /// assert_eq!(
    ///     job.item_key(&["post", "42"]),
    ///     "550e8400-e29b-41d4-a716-446655440000-post-42"
    /// );
    /// ```
    pub fn item_key(&self, parts: &[&str]) -> String {
        let mut key = self.0.to_string();
        for part in parts {
            key.push('-');
            key.push_str(part);
        }
        key
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

// ============================================================================
// Status Types
// ============================================================================

/// Overall result of a job pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Every item succeeded
    Ok,
    /// Some items failed; the rest went through
    Partial,
    /// The credential was rejected; the job cannot continue
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Ok => "ok",
            JobStatus::Partial => "partial",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Report
// ============================================================================

/// One failed item as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    pub display_name: String,
    pub message: String,
}

/// What a job pass achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub job_id: JobId,
    pub status: JobStatus,
    pub completed: usize,
    pub failures: Vec<FailedItem>,
}

impl JobReport {
    /// Summarize the outcomes recorded by `executor`.
    pub async fn from_executor(executor: &IdempotentExecutor) -> Self {
        let errors = executor.errors().await;
        let completed = executor.completed().await.len();

        let status = if errors.iter().any(|f| f.kind() == ErrorKind::InvalidToken) {
            JobStatus::Failed
        } else if errors.is_empty() {
            JobStatus::Ok
        } else {
            JobStatus::Partial
        };

        let failures = errors
            .into_iter()
            .map(|f| FailedItem {
                message: f.message(),
                display_name: f.display_name,
            })
            .collect();

        Self {
            job_id: *executor.job_id(),
            status,
            completed,
            failures,
        }
    }
}
