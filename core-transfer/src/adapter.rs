//! Seams a provider implements to plug into the shared transfer machinery.
//!
//! - [`PageSource`] builds page requests and parses page responses for a
//!   [`ResumableExporter`](crate::export::ResumableExporter).
//! - [`ItemTranslator`] maps a common model item to a provider payload.
//! - [`ErrorClassifier`] decides what a failed write means.

use crate::error::{Result, TransferError};
use bridge_traits::http::{HttpRequest, HttpResponse};

/// One page of translated items plus the cursor for the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }

    /// A page with no items and no continuation.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    /// The next cursor, treating blank strings as absent.
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor
            .as_deref()
            .filter(|cursor| !cursor.trim().is_empty())
    }
}

/// Paged read access to one provider collection.
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Request for the page at `cursor`, or the first page when `None`.
    fn page_request(&self, cursor: Option<&str>) -> Result<HttpRequest>;

    /// Parse a successful page response into common model items.
    fn parse_page(&self, response: &HttpResponse) -> Result<Page<Self::Item>>;
}

/// Maps a common model item into what a provider expects on the wire.
pub trait ItemTranslator<T>: Send + Sync {
    type Payload;

    fn translate(&self, item: &T) -> Result<Self::Payload>;
}

/// Classifies a non-success response to a write request.
pub trait ErrorClassifier: Send + Sync {
    /// Returns `PermissionDenied` or `TransientIo`.
    fn classify_write_error(&self, status: u16, body: &str) -> TransferError;
}

/// Maps 403 responses whose body carries a known quota marker to
/// `PermissionDenied`. Everything else is transient.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorClassifier {
    quota_markers: Vec<String>,
}

impl DefaultErrorClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body fragment that identifies an allowance or quota rejection.
    pub fn with_quota_marker(mut self, marker: impl Into<String>) -> Self {
        self.quota_markers.push(marker.into());
        self
    }
}

impl ErrorClassifier for DefaultErrorClassifier {
    fn classify_write_error(&self, status: u16, body: &str) -> TransferError {
        if status == 403 {
            if let Some(marker) = self.quota_markers.iter().find(|m| body.contains(m.as_str())) {
                return TransferError::PermissionDenied(marker.clone());
            }
        }
        TransferError::bad_status(status, body)
    }
}
