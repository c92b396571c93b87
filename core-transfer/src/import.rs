//! Import side of a provider.

use crate::error::Result;
use crate::idempotent::{IdempotentExecutor, ItemFailure};
use crate::job::JobId;
use async_trait::async_trait;

/// Outcome of an `import` call.
///
/// Per-item failures never fail the call. They are recorded in the executor;
/// `failures` holds the ones for items this call touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub failures: Vec<ItemFailure>,
}

impl ImportResult {
    pub fn ok() -> Self {
        Self {
            failures: Vec::new(),
        }
    }

    /// Collect the recorded failures among the keys one `import` call used.
    pub async fn for_keys<'a, I>(executor: &IdempotentExecutor, keys: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            failures: executor.failures_for(keys).await,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Import side of a provider, generic over the container it consumes.
///
/// Only `InvalidToken` (or a failure before any item is attempted) is
/// returned as `Err`.
#[async_trait]
pub trait Importer<T: Send + Sync>: Send + Sync {
    async fn import(
        &self,
        job_id: &JobId,
        executor: &IdempotentExecutor,
        data: &T,
    ) -> Result<ImportResult>;
}
