//! Room directory - the set of known rooms in creation order
//!
//! Occupancy is never counted here; it is read from the transport's live
//! group membership so the two cannot drift apart.

use crate::entities::{Room, RoomSummary};
use crate::state::HistoryStore;
use crate::traits::RoomOccupancy;

/// Name of the permanent default room
pub const DEFAULT_ROOM: &str = "general";

/// Known rooms, the default one first
#[derive(Debug, Clone)]
pub struct RoomDirectory {
    default_room: String,
    rooms: Vec<Room>,
}

impl RoomDirectory {
    /// Create a directory holding only the permanent `default_room`
    pub fn new(default_room: impl Into<String>) -> Self {
        let default_room = default_room.into();
        Self {
            rooms: vec![Room::new(default_room.clone())],
            default_room,
        }
    }

    /// Name of the permanent room
    pub fn default_room(&self) -> &str {
        &self.default_room
    }

    /// Check if `name` is the permanent room
    pub fn is_default(&self, name: &str) -> bool {
        self.default_room == name
    }

    /// Add the room if it is not known yet; returns true if it was created
    pub fn ensure_exists(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.rooms.push(Room::new(name));
        tracing::debug!(room = %name, "Room created");
        true
    }

    /// Check if the room is known
    pub fn contains(&self, name: &str) -> bool {
        self.rooms.iter().any(|r| r.name == name)
    }

    /// Live occupancy of a room
    pub fn occupancy_of(&self, name: &str, occupancy: &dyn RoomOccupancy) -> usize {
        occupancy.live_count(name)
    }

    /// Every known room with its live occupancy, in creation order
    pub fn list_with_counts(&self, occupancy: &dyn RoomOccupancy) -> Vec<RoomSummary> {
        self.rooms
            .iter()
            .map(|room| RoomSummary::new(room.name.clone(), occupancy.live_count(&room.name)))
            .collect()
    }

    /// Remove every non-default room with no live occupants
    ///
    /// The history of each removed room is discarded as well. Returns the
    /// names of the removed rooms.
    pub fn prune_empty(
        &mut self,
        occupancy: &dyn RoomOccupancy,
        history: &mut HistoryStore,
    ) -> Vec<String> {
        let mut pruned = Vec::new();
        let default_room = self.default_room.clone();

        self.rooms.retain(|room| {
            if room.name == default_room || occupancy.live_count(&room.name) > 0 {
                return true;
            }
            history.drop_room(&room.name);
            pruned.push(room.name.clone());
            false
        });

        for name in &pruned {
            tracing::info!(room = %name, "Empty room pruned");
        }

        pruned
    }

    /// Number of known rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Always false: the default room is permanent
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM)
    }
}
