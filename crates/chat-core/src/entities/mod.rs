//! Domain entities - core business objects

mod message;
mod participant;
mod room;

pub use message::Message;
pub use participant::Participant;
pub use room::{Room, RoomSummary};
