//! # chat-core
//!
//! Domain layer for multi-room chat sessions: nickname registry, room
//! directory, bounded history with reactions, outbound events, and the
//! transport port. This crate has no dependency on any web framework or runtime.

pub mod entities;
pub mod error;
pub mod events;
pub mod state;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Message, Participant, Room, RoomSummary};
pub use error::DomainError;
pub use events::{MessagePayload, ServerEvent};
pub use state::{
    HistoryStore, NicknameRegistry, ReactionAggregator, ReactionDelta, RoomDirectory,
    DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_NICKNAME_LENGTH, DEFAULT_ROOM, SYSTEM_NICKNAME,
};
pub use traits::{RoomOccupancy, Transport};
pub use value_objects::{ConnectionId, MessageId, MessageIdGenerator, MessageIdParseError};
