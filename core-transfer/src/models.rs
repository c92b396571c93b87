//! Common data model exchanged between exporters and importers.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Photos
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl PhotoAlbum {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoModel {
    pub title: String,
    /// Public source URL, or the job store key when `in_temp_store` is set
    pub fetchable_url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
    pub data_id: String,
    #[serde(default)]
    pub album_id: Option<String>,
    #[serde(default)]
    pub in_temp_store: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotosContainer {
    #[serde(default)]
    pub albums: Vec<PhotoAlbum>,
    #[serde(default)]
    pub photos: Vec<PhotoModel>,
}

// ============================================================================
// Calendar
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarModel {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventTime {
    pub date_time: DateTime<FixedOffset>,
    pub date_only: bool,
}

impl CalendarEventTime {
    pub fn new(date_time: DateTime<FixedOffset>, date_only: bool) -> Self {
        Self {
            date_time,
            date_only,
        }
    }

    pub fn utc(date_time: DateTime<Utc>) -> Self {
        Self::new(date_time.fixed_offset(), false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventModel {
    pub calendar_id: String,
    pub title: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_time: Option<CalendarEventTime>,
    #[serde(default)]
    pub end_time: Option<CalendarEventTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarContainer {
    #[serde(default)]
    pub calendars: Vec<CalendarModel>,
    #[serde(default)]
    pub events: Vec<CalendarEventModel>,
}

// ============================================================================
// Social activity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialActivityType {
    Post,
    Checkin,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SocialActivityAttachmentType {
    Link,
    Image,
    Video,
}

impl SocialActivityAttachmentType {
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialActivityAttachment {
    #[serde(rename = "type")]
    pub kind: SocialActivityAttachmentType,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialActivityModel {
    pub id: String,
    #[serde(default)]
    pub published: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub activity_type: SocialActivityType,
    #[serde(default)]
    pub attachments: Vec<SocialActivityAttachment>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SocialActivityModel {
    /// Title for reports, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// URLs of attachments of one kind, in order.
    pub fn attachment_urls<'a>(
        &'a self,
        accept: impl Fn(SocialActivityAttachmentType) -> bool + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.attachments
            .iter()
            .filter(move |a| accept(a.kind))
            .map(|a| a.url.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialActivityContainer {
    #[serde(default)]
    pub activities: Vec<SocialActivityModel>,
}
