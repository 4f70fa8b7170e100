//! Request DTOs for inbound client events
//!
//! Field names follow the JSON the browser client sends.

use chat_core::MessageId;
use serde::Deserialize;

/// `joinRoom` request
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomRequest {
    pub nickname: String,
    #[serde(default)]
    pub room: String,
}

/// `changeRoom` request
///
/// `old_room` is what the client believes it is leaving; the server's own
/// record of the participant's room wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoomRequest {
    pub new_room: String,
    #[serde(default)]
    pub old_room: Option<String>,
}

/// `chatMessage` request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ChatMessageRequest {
    /// True when neither text nor image carries anything
    pub fn is_empty(&self) -> bool {
        self.message.as_deref().is_none_or(str::is_empty)
            && self.image.as_deref().is_none_or(str::is_empty)
    }
}

/// `reaction` request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionRequest {
    pub message_id: MessageId,
    pub reaction: String,
}
