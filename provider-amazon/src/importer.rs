//! Amazon Photos importer
//!
//! Copies albums and photos into Amazon Photos. Each album becomes a folder
//! holding its photos plus a `VISUAL_COLLECTION` album over that folder.

use async_trait::async_trait;
use bridge_traits::storage::JobStore;
use bytes::Bytes;
use core_auth::{AppCredentials, TokensAndUrlAuthData};
use core_runtime::config::TransferConfig;
use core_transfer::models::{PhotoAlbum, PhotoModel, PhotosContainer};
use core_transfer::{IdempotentExecutor, ImportResult, Importer, JobId};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info, instrument};

use crate::client::AmazonPhotosClient;
use crate::error::AmazonError;
use crate::types::{EndPoint, Node};

const COPY_PREFIX: &str = "Copy of ";

pub struct AmazonPhotosImporter {
    client: AmazonPhotosClient,
    job_store: Option<Arc<dyn JobStore>>,
}

impl AmazonPhotosImporter {
    pub fn new(client: AmazonPhotosClient, job_store: Option<Arc<dyn JobStore>>) -> Self {
        Self { client, job_store }
    }

    /// Bind an importer to one user's authorization.
    pub fn connect(
        config: &TransferConfig,
        auth: &TokensAndUrlAuthData,
        app: &AppCredentials,
    ) -> Self {
        Self::new(
            AmazonPhotosClient::connect(config, auth, app),
            config.job_store.clone(),
        )
    }

    async fn create_album_folder(
        &self,
        endpoint: &EndPoint,
        album: &PhotoAlbum,
        root_id: &str,
    ) -> core_transfer::Result<String> {
        let node = Node::folder(format!("{}{}", COPY_PREFIX, album.name), root_id);
        Ok(self.client.create_node(endpoint, &node).await?)
    }

    async fn create_album(
        &self,
        endpoint: &EndPoint,
        album: &PhotoAlbum,
        folder_id: &str,
    ) -> core_transfer::Result<String> {
        let node = Node::visual_collection(format!("{}{}", COPY_PREFIX, album.name), folder_id);
        Ok(self.client.create_node(endpoint, &node).await?)
    }

    async fn import_photo(
        &self,
        job_id: &JobId,
        endpoint: &EndPoint,
        photo: &PhotoModel,
        executor: &IdempotentExecutor,
    ) -> core_transfer::Result<String> {
        // Fails the photo when its album folder was never created.
        let folder_id = match photo.album_id.as_deref().filter(|id| !id.is_empty()) {
            Some(album_id) => Some(executor.get_cached_value(album_id).await?),
            None => None,
        };

        let content = self.read_photo(job_id, photo).await?;
        let media = self
            .client
            .upload_media(endpoint, content, &photo.title, folder_id.as_deref())
            .await?;

        debug!(data_id = %photo.data_id, media_id = %media.id, "Uploaded photo");
        Ok(media.id)
    }

    async fn read_photo(&self, job_id: &JobId, photo: &PhotoModel) -> Result<Bytes, AmazonError> {
        if !photo.in_temp_store {
            return self.client.download(&photo.fetchable_url).await;
        }

        let store = self
            .job_store
            .as_ref()
            .ok_or_else(|| AmazonError::JobStoreMissing {
                title: photo.title.clone(),
            })?;
        let mut stream = store
            .get_stream(&job_id.to_string(), &photo.fetchable_url)
            .await?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok(Bytes::from(buf))
    }
}

/// Idempotency key of a photo: its source album id and data id.
pub fn photo_key(photo: &PhotoModel) -> String {
    format!(
        "{}-{}",
        photo.album_id.as_deref().unwrap_or_default(),
        photo.data_id
    )
}

#[async_trait]
impl Importer<PhotosContainer> for AmazonPhotosImporter {
    #[instrument(skip(self, executor, data), fields(job_id = %job_id))]
    async fn import(
        &self,
        job_id: &JobId,
        executor: &IdempotentExecutor,
        data: &PhotosContainer,
    ) -> core_transfer::Result<ImportResult> {
        if data.albums.is_empty() && data.photos.is_empty() {
            return Ok(ImportResult::ok());
        }

        let endpoint = self.client.get_endpoints().await?;
        if !endpoint.customer_exists {
            return Err(AmazonError::CustomerNotRegistered.into());
        }
        let root_id = self
            .client
            .get_root_node(&endpoint)
            .await?
            .id
            .ok_or(AmazonError::RootNodeMissing)?;

        info!(
            albums = data.albums.len(),
            photos = data.photos.len(),
            "Importing into Amazon Photos"
        );

        let mut keys = Vec::new();
        for album in &data.albums {
            let folder = executor
                .execute_and_swallow(&album.id, &album.name, || {
                    self.create_album_folder(&endpoint, album, &root_id)
                })
                .await?;
            keys.push(album.id.clone());

            let folder_id = folder.value().unwrap_or_default();
            let album_key = format!("{}-{}", album.id, folder_id);
            executor
                .execute_and_swallow(&album_key, &album.name, || async {
                    let folder_id = executor.get_cached_value(&album.id).await?;
                    self.create_album(&endpoint, album, &folder_id).await
                })
                .await?;
            keys.push(album_key);
        }

        for photo in &data.photos {
            let key = photo_key(photo);
            executor
                .execute_and_swallow(&key, &photo.title, || {
                    self.import_photo(job_id, &endpoint, photo, executor)
                })
                .await?;
            keys.push(key);
        }

        Ok(ImportResult::for_keys(executor, keys.iter().map(String::as_str)).await)
    }
}
