//! Job-Scoped Byte Storage
//!
//! Some items are staged earlier in a job (for example, photos copied out of a
//! source archive) instead of being fetched live from a source URL. Importers
//! read those payloads back through [`JobStore`].

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::error::Result;

/// Temporary per-job byte storage.
///
/// Keys are scoped to a job: the same key under two job ids names two
/// different objects. Implementations must be safe to share across tasks.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::JobStore;
/// use tokio::io::AsyncReadExt;
///
/// async fn load(store: &dyn JobStore, job_id: &str) -> Result<Vec<u8>> {
///     let mut stream = store.get_stream(job_id, "photo-1").await?;
///     let mut buf = Vec::new();
///     stream.read_to_end(&mut buf).await?;
///     Ok(buf)
/// }
/// ```
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Stage bytes under `key` for the given job, replacing any previous value.
    async fn create_stream(&self, job_id: &str, key: &str, data: Bytes) -> Result<()>;

    /// Open a previously staged payload.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::NotFound` if nothing was staged under `key`.
    async fn get_stream(
        &self,
        job_id: &str,
        key: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>>;

    /// Drop everything staged for a job.
    async fn remove_job(&self, job_id: &str) -> Result<()>;
}
