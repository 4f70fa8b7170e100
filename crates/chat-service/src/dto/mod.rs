//! Data transfer objects for inbound client events

pub mod requests;

pub use requests::{ChangeRoomRequest, ChatMessageRequest, JoinRoomRequest, ReactionRequest};
