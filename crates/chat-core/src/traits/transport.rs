//! Transport port - what the session layer needs from the connection layer
//!
//! The domain defines the interface; the gateway provides the implementation.
//! Every call is one-way: there is no return value to wait on and no retry,
//! and delivery failure to an individual connection stays inside the transport.

use crate::events::ServerEvent;
use crate::value_objects::ConnectionId;

/// Live group membership counts
pub trait RoomOccupancy {
    /// Number of connections currently in the room's group
    fn live_count(&self, room: &str) -> usize;
}

impl<F> RoomOccupancy for F
where
    F: Fn(&str) -> usize,
{
    fn live_count(&self, room: &str) -> usize {
        self(room)
    }
}

/// Connection, grouping, and fan-out primitives
pub trait Transport: RoomOccupancy + Send + Sync {
    /// Add a connection to a room group
    fn join(&self, connection: &ConnectionId, room: &str);

    /// Remove a connection from a room group
    fn leave(&self, connection: &ConnectionId, room: &str);

    /// Send an event to one connection
    fn send_to(&self, connection: &ConnectionId, event: &ServerEvent);

    /// Send an event to every connection in a room, optionally skipping one
    fn broadcast_to(&self, room: &str, event: &ServerEvent, excluding: Option<&ConnectionId>);

    /// Send an event to every open connection
    fn broadcast_all(&self, event: &ServerEvent);
}
