//! Value objects - immutable types that represent domain concepts

mod connection_id;
mod message_id;

pub use connection_id::ConnectionId;
pub use message_id::{MessageId, MessageIdGenerator, MessageIdParseError};
