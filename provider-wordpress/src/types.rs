//! WordPress.com REST v1.2 post types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PostStatus {
    Publish,
    Draft,
    Private,
    Pending,
    Future,
    AutoDraft,
}

/// Body of a create or edit call. Unset fields are left untouched on edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// ISO 8601 publish date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,

    /// Media WordPress should sideload into the post
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media_urls: Vec<String>,
}

/// A post as returned by the API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(rename = "ID")]
    pub id: u64,

    #[serde(rename = "site_ID", default)]
    pub site_id: Option<u64>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub attachment_count: u32,

    /// Keyed by attachment id
    #[serde(default)]
    pub attachments: BTreeMap<String, PostAttachment>,

    #[serde(default)]
    pub media_errors: Vec<MediaError>,
}

impl Post {
    /// VideoPress ids of the post's video attachments.
    pub fn video_guids(&self) -> impl Iterator<Item = &str> {
        self.attachments
            .values()
            .filter_map(|a| a.videopress_guid.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostAttachment {
    #[serde(rename = "ID", default)]
    pub id: u64,

    /// Set only for videos
    #[serde(default)]
    pub videopress_guid: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub extension: Option<String>,
}

/// A `media_urls` entry WordPress could not sideload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaError {
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_edit_request_only_sends_content() {
        let edit = PostRequest {
            content: Some("hello".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&edit).unwrap(), json!({"content": "hello"}));
    }

    #[test]
    fn test_status_names() {
        assert_eq!(serde_json::to_value(PostStatus::Draft).unwrap(), "draft");
        assert_eq!(serde_json::to_value(PostStatus::AutoDraft).unwrap(), "auto-draft");
    }

    #[test]
    fn test_post_response() {
        let post: Post = serde_json::from_value(json!({
            "ID": 42,
            "site_ID": 7,
            "content": "<p>hi</p>",
            "attachment_count": 2,
            "attachments": {
                "10": {"ID": 10, "mime_type": "image/jpeg", "extension": "jpg"},
                "11": {"ID": 11, "videopress_guid": "AbCd1234", "mime_type": "video/mp4"}
            },
            "media_errors": [{"file": "x.png", "error": "http_404", "message": "Not Found"}]
        }))
        .unwrap();

        assert_eq!(post.id, 42);
        assert_eq!(post.site_id, Some(7));
        assert_eq!(post.video_guids().collect::<Vec<_>>(), vec!["AbCd1234"]);
        assert_eq!(post.media_errors.len(), 1);
    }
}
