//! Frame payload definitions

use chat_service::{ChangeRoomRequest, ChatMessageRequest, JoinRoomRequest, ReactionRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Payload for op 10 (Hello)
///
/// Sent by the server immediately after connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Heartbeat interval in milliseconds
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// Create a Hello payload with custom interval
    #[must_use]
    pub fn with_interval(heartbeat_interval: u64) -> Self {
        Self { heartbeat_interval }
    }
}

/// Why an op 2 frame could not be turned into a [`ClientEvent`]
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("event name missing")]
    MissingName,

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("invalid {event} payload: {source}")]
    Payload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Inbound chat events (op 2), keyed by the frame's `t`
#[derive(Debug, Clone)]
pub enum ClientEvent {
    JoinRoom(JoinRoomRequest),
    ChangeRoom(ChangeRoomRequest),
    ChatMessage(ChatMessageRequest),
    Typing,
    Reaction(ReactionRequest),
}

impl ClientEvent {
    pub const JOIN_ROOM: &'static str = "joinRoom";
    pub const CHANGE_ROOM: &'static str = "changeRoom";
    pub const CHAT_MESSAGE: &'static str = "chatMessage";
    pub const TYPING: &'static str = "typing";
    pub const REACTION: &'static str = "reaction";

    /// Decode an event from its wire name and payload
    pub fn parse(name: Option<&str>, data: Option<Value>) -> Result<Self, EventParseError> {
        let name = name.ok_or(EventParseError::MissingName)?;
        let data = data.unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        match name {
            Self::JOIN_ROOM => decode(Self::JOIN_ROOM, data).map(Self::JoinRoom),
            Self::CHANGE_ROOM => decode(Self::CHANGE_ROOM, data).map(Self::ChangeRoom),
            Self::CHAT_MESSAGE => decode(Self::CHAT_MESSAGE, data).map(Self::ChatMessage),
            Self::TYPING => Ok(Self::Typing),
            Self::REACTION => decode(Self::REACTION, data).map(Self::Reaction),
            other => Err(EventParseError::UnknownEvent(other.to_string())),
        }
    }

    /// Wire name of the event
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JoinRoom(_) => Self::JOIN_ROOM,
            Self::ChangeRoom(_) => Self::CHANGE_ROOM,
            Self::ChatMessage(_) => Self::CHAT_MESSAGE,
            Self::Typing => Self::TYPING,
            Self::Reaction(_) => Self::REACTION,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    event: &'static str,
    data: Value,
) -> Result<T, EventParseError> {
    serde_json::from_value(data).map_err(|source| EventParseError::Payload { event, source })
}
