//! Outbound events - everything the session layer asks the transport to deliver

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::entities::{Message, RoomSummary};
use crate::state::SYSTEM_NICKNAME;
use crate::value_objects::{ConnectionId, MessageId};

/// A message as clients see it
///
/// Used for stored chat messages (with `id` and `reactions`) and for system
/// notices (neither).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions: Option<BTreeMap<String, Vec<ConnectionId>>>,
}

impl MessagePayload {
    /// A server notice such as "alice joined the room."
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            id: None,
            nickname: SYSTEM_NICKNAME.to_string(),
            message: Some(text.into()),
            image: None,
            time: format_time(Utc::now()),
            reactions: None,
        }
    }
}

impl From<&Message> for MessagePayload {
    fn from(message: &Message) -> Self {
        Self {
            id: Some(message.id),
            nickname: message.sender.clone(),
            message: message.text.clone(),
            image: message.image.clone(),
            time: format_time(message.created_at),
            reactions: Some(message.reactions()),
        }
    }
}

/// Render a timestamp as `HH:MM` in server local time
pub fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

/// Events sent from the server to clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Every known room with its occupancy
    RoomList(Vec<RoomSummary>),
    /// The requested nickname was claimed
    NicknameAccepted,
    /// The requested nickname was rejected, with a reason for the user
    NicknameError(String),
    /// A chat message or system notice
    Message(MessagePayload),
    /// Full replay of a room's history
    MessageHistory(Vec<MessagePayload>),
    /// Someone in the room is typing
    Typing { nickname: String },
    /// A reaction was added to a message
    Reaction { message_id: MessageId, reaction: String },
    /// A reaction was withdrawn from a message
    ReactionRemoved { message_id: MessageId, reaction: String },
}

impl ServerEvent {
    /// Wire name of the event
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RoomList(_) => "roomList",
            Self::NicknameAccepted => "nicknameAccepted",
            Self::NicknameError(_) => "nicknameError",
            Self::Message(_) => "message",
            Self::MessageHistory(_) => "messageHistory",
            Self::Typing { .. } => "typing",
            Self::Reaction { .. } => "reaction",
            Self::ReactionRemoved { .. } => "reactionRemoved",
        }
    }

    /// JSON payload of the event
    pub fn payload(&self) -> Value {
        match self {
            Self::RoomList(rooms) => serde_json::to_value(rooms).unwrap_or_default(),
            Self::NicknameAccepted => Value::Null,
            Self::NicknameError(reason) => Value::String(reason.clone()),
            Self::Message(message) => serde_json::to_value(message).unwrap_or_default(),
            Self::MessageHistory(messages) => serde_json::to_value(messages).unwrap_or_default(),
            Self::Typing { nickname } => json!({ "nickname": nickname }),
            Self::Reaction {
                message_id,
                reaction,
            }
            | Self::ReactionRemoved {
                message_id,
                reaction,
            } => json!({ "messageId": message_id, "reaction": reaction }),
        }
    }

    /// Build a `messageHistory` event from a history snapshot
    pub fn history(messages: &[Message]) -> Self {
        Self::MessageHistory(messages.iter().map(MessagePayload::from).collect())
    }

    /// Build a system notice event
    pub fn notice(text: impl Into<String>) -> Self {
        Self::Message(MessagePayload::system(text))
    }
}
