//! Participant entity - a connection that has joined under a nickname

use crate::value_objects::ConnectionId;

/// An active chat participant
///
/// Created on a successful join, its `room` changes on room switch, and it is
/// dropped on disconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub nickname: String,
    pub room: String,
}

impl Participant {
    /// Create a new Participant
    pub fn new(connection_id: ConnectionId, nickname: String, room: String) -> Self {
        Self {
            connection_id,
            nickname,
            room,
        }
    }

    /// Check if the participant is currently in `room`
    #[inline]
    pub fn is_in(&self, room: &str) -> bool {
        self.room == room
    }
}
