//! File descriptors attached to requests.
//!
//! Only metadata is tracked: the bytes stay with whoever holds the `url`
//! reference (an object URL for the duration of a form session, or a link
//! handed out by the backend).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::timestamps::utc_timestamp;

/// Largest file an admin may attach when resolving a request (100 MB).
pub const MAX_RESOLUTION_ATTACHMENT_BYTES: u64 = 100 * 1024 * 1024;

/// Unique identifier for an attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(pub String);

impl AttachmentId {
    pub fn new() -> Self {
        AttachmentId(Uuid::new_v4().simple().to_string())
    }
}

impl Default for AttachmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for AttachmentId {
    fn from(id: &str) -> Self {
        AttachmentId(id.to_string())
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.chars().take(8).collect::<String>())
    }
}

/// A file supplied by a requester at submission or by an admin at resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Where the content can be fetched from
    pub url: String,
    #[serde(with = "utc_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Attachment {
    /// Describe a file picked in the current session.
    pub fn new(name: impl Into<String>, size: u64, url: impl Into<String>) -> Self {
        Self {
            id: AttachmentId::new(),
            name: name.into(),
            size,
            url: url.into(),
            created_at: Utc::now(),
        }
    }

    /// Size in mebibytes with two decimals, e.g. `0.59 MB`.
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size as f64 / (1024.0 * 1024.0))
    }
}
