//! # chat-service
//!
//! Application layer: the session coordinator that owns all chat state and
//! decides who receives which event.

pub mod dto;
pub mod services;

pub use dto::{ChangeRoomRequest, ChatMessageRequest, JoinRoomRequest, ReactionRequest};
pub use services::{ServiceError, ServiceResult, SessionCoordinator, SessionPhase};
