//! Jump-to-message targets handed to the host.

use serde::Serialize;

use trawl_shared::{ChannelId, Message, MessageId};

/// How the host should scroll to the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JumpType {
    #[default]
    Instant,
}

/// A located message the host should open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JumpTarget {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    /// Highlight the message briefly after jumping.
    pub flash: bool,
    pub jump_type: JumpType,
}

impl From<&Message> for JumpTarget {
    fn from(message: &Message) -> Self {
        Self {
            channel_id: message.channel_id.clone(),
            message_id: message.id.clone(),
            flash: true,
            jump_type: JumpType::Instant,
        }
    }
}

/// Host routing primitive: switch to the channel and scroll to the message.
///
/// Fire-and-forget; only ever called with ids taken from visible results.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &JumpTarget);
}
