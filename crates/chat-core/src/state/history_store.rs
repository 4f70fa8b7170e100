//! History store - bounded per-room message log

use std::collections::{HashMap, VecDeque};

use crate::entities::Message;
use crate::error::DomainError;
use crate::value_objects::MessageId;

/// Default number of messages retained per room
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Per-room message history, oldest first, bounded by `limit`
#[derive(Debug, Clone)]
pub struct HistoryStore {
    limit: usize,
    rooms: HashMap<String, VecDeque<Message>>,
}

impl HistoryStore {
    /// Create an empty store retaining at most `limit` messages per room
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            rooms: HashMap::new(),
        }
    }

    /// Append a message to its room's history
    ///
    /// Returns the oldest message if it had to be evicted.
    pub fn append(&mut self, message: Message) -> Option<Message> {
        let history = self.rooms.entry(message.room.clone()).or_default();
        history.push_back(message);

        if history.len() > self.limit {
            history.pop_front()
        } else {
            None
        }
    }

    /// Snapshot of a room's history, oldest first; empty if the room has none
    pub fn get(&self, room: &str) -> Vec<Message> {
        self.rooms
            .get(room)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Find a message in a room by id
    pub fn find_by_id(&self, room: &str, id: MessageId) -> Result<&Message, DomainError> {
        self.rooms
            .get(room)
            .and_then(|history| history.iter().find(|m| m.id == id))
            .ok_or(DomainError::UnknownMessageId(id))
    }

    /// Mutable lookup used by the reaction aggregator
    pub(crate) fn find_by_id_mut(
        &mut self,
        room: &str,
        id: MessageId,
    ) -> Result<&mut Message, DomainError> {
        self.rooms
            .get_mut(room)
            .and_then(|history| history.iter_mut().find(|m| m.id == id))
            .ok_or(DomainError::UnknownMessageId(id))
    }

    /// Discard a room's history
    pub fn drop_room(&mut self, room: &str) -> bool {
        self.rooms.remove(room).is_some()
    }

    /// Number of messages held for a room
    pub fn len(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, VecDeque::len)
    }

    /// Check if the room has any history entry at all
    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.contains_key(room)
    }

    /// Configured per-room bound
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
