//! WordPress posts importer
//!
//! Each social activity becomes a draft post on the user's site.

use async_trait::async_trait;
use core_auth::{AppCredentials, TokensAndUrlAuthData};
use core_runtime::config::TransferConfig;
use core_transfer::models::{SocialActivityAttachmentType, SocialActivityContainer, SocialActivityModel};
use core_transfer::{IdempotentExecutor, ImportResult, Importer, ItemTranslator, JobId, Result};
use tracing::{debug, info, instrument};

use crate::client::WordPressClient;
use crate::types::{PostRequest, PostStatus};

/// Maps an activity to a draft post.
///
/// Links are appended to the content on their own lines so WordPress embeds
/// them. Images and videos are handed over as `media_urls`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostTranslator;

impl ItemTranslator<SocialActivityModel> for PostTranslator {
    type Payload = PostRequest;

    fn translate(&self, activity: &SocialActivityModel) -> Result<PostRequest> {
        let mut content = activity.content.clone().unwrap_or_default();
        for url in activity.attachment_urls(|kind| kind == SocialActivityAttachmentType::Link) {
            content.push('\n');
            content.push_str(url);
        }

        Ok(PostRequest {
            title: activity.title.clone(),
            content: Some(content),
            date: activity.published.map(|published| published.to_rfc3339()),
            status: Some(PostStatus::Draft),
            media_urls: activity
                .attachment_urls(|kind| kind.is_media())
                .map(str::to_string)
                .collect(),
        })
    }
}

pub struct WordPressPostsImporter {
    client: WordPressClient,
    site_id: String,
    translator: PostTranslator,
}

impl WordPressPostsImporter {
    pub fn new(client: WordPressClient, site_id: impl Into<String>) -> Self {
        Self {
            client,
            site_id: site_id.into(),
            translator: PostTranslator,
        }
    }

    /// Bind an importer to one user's authorization. The site id is read from
    /// the auth data's token URL slot.
    pub fn connect(
        config: &TransferConfig,
        auth: &TokensAndUrlAuthData,
        app: &AppCredentials,
    ) -> Self {
        Self::new(
            WordPressClient::connect(config, auth, app),
            auth.token_server_url.clone(),
        )
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    async fn import_post(&self, activity: &SocialActivityModel) -> Result<String> {
        let request = self.translator.translate(activity)?;
        let created = self.client.create_post(&self.site_id, &request).await?;

        for media_error in &created.media_errors {
            info!(
                post = activity.display_name(),
                file = media_error.file.as_deref().unwrap_or_default(),
                error = media_error.error.as_deref().unwrap_or_default(),
                message = media_error.message.as_deref().unwrap_or_default(),
                "WordPress post has media error"
            );
        }

        if request.media_urls.is_empty() || created.attachment_count == 0 {
            return Ok(created.id.to_string());
        }

        debug!(attachments = created.attachments.len(), "Checking attachments for videos");
        let embeds: String = created
            .video_guids()
            .map(|guid| format!("\n[wpvideo {}]", guid))
            .collect();
        if embeds.is_empty() {
            return Ok(created.id.to_string());
        }

        let edit = PostRequest {
            content: Some(format!("{}{}", created.content, embeds)),
            ..Default::default()
        };
        let edited = self.client.edit_post(&self.site_id, created.id, &edit).await?;
        Ok(edited.id.to_string())
    }
}

#[async_trait]
impl Importer<SocialActivityContainer> for WordPressPostsImporter {
    #[instrument(skip(self, executor, data), fields(job_id = %job_id, site_id = %self.site_id))]
    async fn import(
        &self,
        job_id: &JobId,
        executor: &IdempotentExecutor,
        data: &SocialActivityContainer,
    ) -> Result<ImportResult> {
        debug!(activities = data.activities.len(), "Starting posts import");

        let mut keys = Vec::with_capacity(data.activities.len());
        for activity in &data.activities {
            let key = job_id.item_key(&[&activity.id]);
            executor
                .execute_and_swallow(&key, activity.display_name(), || {
                    self.import_post(activity)
                })
                .await?;
            keys.push(key);
        }

        Ok(ImportResult::for_keys(executor, keys.iter().map(String::as_str)).await)
    }
}
