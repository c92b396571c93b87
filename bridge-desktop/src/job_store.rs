//! Filesystem-backed job store using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::JobStore,
};
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

/// Stores staged payloads as one file per key under `<root>/<job id>/`.
///
/// Keys are percent-encoded into file names, so URL-shaped keys are safe.
pub struct FsJobStore {
    root: PathBuf,
}

impl FsJobStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store under the platform temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("transfer-core-jobs"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn job_dir(&self, job_id: &str) -> PathBuf {
        self.root.join(urlencoding::encode(job_id).as_ref())
    }

    fn object_path(&self, job_id: &str, key: &str) -> PathBuf {
        self.job_dir(job_id).join(urlencoding::encode(key).as_ref())
    }
}

impl Default for FsJobStore {
    fn default() -> Self {
        Self::in_temp_dir()
    }
}

#[async_trait]
impl JobStore for FsJobStore {
    async fn create_stream(&self, job_id: &str, key: &str, data: Bytes) -> Result<()> {
        fs::create_dir_all(self.job_dir(job_id)).await?;

        let path = self.object_path(job_id, key);
        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        debug!(job_id, bytes = data.len(), "Staged job payload");
        Ok(())
    }

    async fn get_stream(
        &self,
        job_id: &str,
        key: &str,
    ) -> Result<Box<dyn AsyncRead + Send + Unpin>> {
        match fs::File::open(self.object_path(job_id, key)).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BridgeError::NotFound(format!(
                "job {} has no staged object {}",
                job_id, key
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_job(&self, job_id: &str) -> Result<()> {
        match fs::remove_dir_all(self.job_dir(job_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
