//! # Idempotent Execution
//!
//! Per-job record of side-effecting operations keyed by an idempotency key.
//!
//! ## Overview
//!
//! The first call for a key runs its operation and records the outcome. Every
//! later call for that key, including calls racing with the first, observes the
//! recorded outcome without running anything. Outcomes never change once
//! recorded, so a second pass over the same job skips work that already
//! happened.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let executor = IdempotentExecutor::new(job_id);
//!
//! executor
//!     .execute_and_swallow(&album.id, &album.name, || importer.create_album(&album))
//!     .await?;
//!
//! // Later, for a photo in that album:
//! let album_id = executor.get_cached_value(&album.id).await?;
//! ```

use crate::error::{ErrorKind, Result, TransferError};
use crate::job::JobId;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

/// A failed item, as recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub key: String,
    pub display_name: String,
    pub error: TransferError,
}

impl ItemFailure {
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Recorded result of one keyed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(ItemFailure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ItemFailure> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(failure) => Some(failure),
        }
    }
}

type Slot = Arc<OnceCell<Outcome>>;

/// Single-flight, record-once executor for one job.
pub struct IdempotentExecutor {
    job_id: JobId,
    slots: Mutex<HashMap<String, Slot>>,
    recorded: Mutex<Vec<String>>,
}

impl IdempotentExecutor {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            slots: Mutex::new(HashMap::new()),
            recorded: Mutex::new(Vec::new()),
        }
    }

    /// Start another pass of `job_id`, treating `completed` keys as done.
    pub fn resume<I>(job_id: JobId, completed: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let slots = completed
            .into_iter()
            .map(|(key, value)| {
                let slot = Arc::new(OnceCell::new_with(Some(Outcome::Success(value))));
                (key, slot)
            })
            .collect();

        Self {
            job_id,
            slots: Mutex::new(slots),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Run `operation` at most once for `key` and return the recorded outcome.
    ///
    /// Failures are recorded and returned as `Ok(Outcome::Failure)` so the
    /// caller's batch keeps going. A recorded `InvalidToken` is the exception:
    /// every observer gets it back as `Err`.
    pub async fn execute_and_swallow<F, Fut>(
        &self,
        key: &str,
        display_name: &str,
        operation: F,
    ) -> Result<Outcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let outcome = self.record(key, display_name, operation).await;

        match outcome {
            Outcome::Failure(ItemFailure {
                error: TransferError::InvalidToken(message),
                ..
            }) => Err(TransferError::InvalidToken(message)),
            outcome => Ok(outcome),
        }
    }

    /// Like [`execute_and_swallow`](Self::execute_and_swallow), but a recorded
    /// failure comes back as `Err`.
    pub async fn execute_or_throw<F, Fut>(
        &self,
        key: &str,
        display_name: &str,
        operation: F,
    ) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        match self.record(key, display_name, operation).await {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(failure) => Err(failure.error),
        }
    }

    /// The recorded success for `key`, or `NotFound`.
    pub async fn get_cached_value(&self, key: &str) -> Result<String> {
        let slot = self.slots.lock().await.get(key).cloned();

        match slot.as_deref().and_then(OnceCell::get) {
            Some(Outcome::Success(value)) => Ok(value.clone()),
            _ => Err(TransferError::NotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Whether any outcome is recorded for `key`.
    pub async fn is_key_cached(&self, key: &str) -> bool {
        self.slots
            .lock()
            .await
            .get(key)
            .is_some_and(|slot| slot.initialized())
    }

    /// Recorded failures, in the order they were recorded.
    pub async fn errors(&self) -> Vec<ItemFailure> {
        let order = self.recorded.lock().await.clone();
        let slots = self.slots.lock().await;

        order
            .iter()
            .filter_map(|key| slots.get(key))
            .filter_map(|slot| slot.get())
            .filter_map(|outcome| outcome.failure().cloned())
            .collect()
    }

    /// Recorded failures among `keys`, once each, in `keys` order.
    pub async fn failures_for<'a, I>(&self, keys: I) -> Vec<ItemFailure>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let slots = self.slots.lock().await;
        let mut seen = HashSet::new();

        keys.into_iter()
            .filter(|key| seen.insert(*key))
            .filter_map(|key| slots.get(key))
            .filter_map(|slot| slot.get())
            .filter_map(|outcome| outcome.failure().cloned())
            .collect()
    }

    /// Snapshot of every recorded success, suitable for [`resume`](Self::resume).
    pub async fn completed(&self) -> BTreeMap<String, String> {
        self.slots
            .lock()
            .await
            .iter()
            .filter_map(|(key, slot)| match slot.get() {
                Some(Outcome::Success(value)) => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    async fn slot(&self, key: &str) -> Slot {
        self.slots
            .lock()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    async fn record<F, Fut>(&self, key: &str, display_name: &str, operation: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String>>,
    {
        let slot = self.slot(key).await;

        if let Some(outcome) = slot.get() {
            debug!(job_id = %self.job_id, key, "Outcome already recorded, skipping");
            return outcome.clone();
        }

        slot.get_or_init(|| async {
            let outcome = match operation().await {
                Ok(value) => Outcome::Success(value),
                Err(error) => {
                    warn!(
                        job_id = %self.job_id,
                        key,
                        display_name,
                        kind = %error.kind(),
                        error = %error,
                        "Recording item failure"
                    );
                    Outcome::Failure(ItemFailure {
                        key: key.to_string(),
                        display_name: display_name.to_string(),
                        error,
                    })
                }
            };
            self.recorded.lock().await.push(key.to_string());
            outcome
        })
        .await
        .clone()
    }
}
