//! Room entity - a named group that participants occupy

use serde::{Deserialize, Serialize};

/// A known room
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Room {
    pub name: String,
}

impl Room {
    /// Create a new Room
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Resolve a client-supplied room name
    ///
    /// Surrounding whitespace is dropped and a blank name means `default_room`.
    pub fn resolve_name(raw: &str, default_room: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            default_room.to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Room name with its live occupancy, as sent in `roomList`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub name: String,
    pub count: usize,
}

impl RoomSummary {
    /// Create a new RoomSummary
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}
