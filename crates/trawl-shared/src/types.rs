use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{UNKNOWN_USERNAME, UNKNOWN_USER_ID};

// ---------------------------------------------------------------------------
// Search tabs
// ---------------------------------------------------------------------------

/// A search category with its own backend filter and pagination state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchTab {
    #[default]
    Messages,
    Media,
    Files,
}

impl SearchTab {
    /// Name used as the tab key on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Messages => "messages",
            Self::Media => "media",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for SearchTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Opaque backend message id, unique within a search scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque backend channel id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Author
// ---------------------------------------------------------------------------

/// Summary of the user who posted a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub username: String,
    /// Display name, preferred over `username` when present.
    pub global_name: Option<String>,
    /// Avatar hash as issued by the backend.
    pub avatar: Option<String>,
}

impl Author {
    /// Placeholder for results whose author object is missing or malformed.
    pub fn unknown() -> Self {
        Self {
            id: UNKNOWN_USER_ID.to_string(),
            username: UNKNOWN_USERNAME.to_string(),
            global_name: None,
            avatar: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.username)
    }
}

impl Default for Author {
    fn default() -> Self {
        Self::unknown()
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A file attached to a message.  The id is scoped to the owning message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    /// Size in bytes.
    pub size: Option<u64>,
    pub url: Option<String>,
    pub proxy_url: Option<String>,
    /// Declared MIME type, e.g. `image/png`.
    pub content_type: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Attachment {
    /// Lower-cased filename extension, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Human-readable size, e.g. `"1.5 KB"`.
    pub fn display_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Category an attachment falls into.  Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    File,
}

impl AttachmentKind {
    /// Whether the attachment belongs to the media tab.
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single search hit.  Built fresh on every normalization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// Text content, empty for attachment-only messages.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub author: Author,
    pub attachments: Vec<Attachment>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Format a byte count using binary units, capped at GB.
pub fn format_bytes(size: Option<u64>) -> String {
    let Some(size) = size else {
        return "Unknown size".to_string();
    };
    if size < 1024 {
        return format!("{size} B");
    }

    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    let mut value = size as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
