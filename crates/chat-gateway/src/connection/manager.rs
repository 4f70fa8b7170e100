//! Connection manager
//!
//! Manages all active WebSocket connections and their room groups using
//! DashMap for thread-safe access. This is the gateway's [`Transport`].

use super::Connection;
use crate::protocol::GatewayMessage;
use chat_core::{ConnectionId, RoomOccupancy, ServerEvent, Transport};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    /// Active connections by connection ID
    connections: DashMap<ConnectionId, Arc<Connection>>,

    /// Room name to member connection IDs
    room_connections: DashMap<String, HashSet<ConnectionId>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            room_connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection
    pub fn add_connection(
        &self,
        id: ConnectionId,
        sender: mpsc::Sender<GatewayMessage>,
    ) -> Arc<Connection> {
        let connection = Connection::new(id.clone(), sender);
        self.connections.insert(id.clone(), connection.clone());

        tracing::debug!(connection = %id, "Connection added");

        connection
    }

    /// Remove a connection and drop it from every room group
    pub fn remove_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(id)?;

        self.room_connections.alter_all(|_, mut members| {
            members.remove(id);
            members
        });
        self.room_connections.retain(|_, members| !members.is_empty());

        tracing::debug!(connection = %id, "Connection removed");
        Some(connection)
    }

    /// Get a connection by ID
    pub fn get_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|r| r.clone())
    }

    /// Get all connections in a room group
    pub fn get_room_connections(&self, room: &str) -> Vec<Arc<Connection>> {
        self.room_connections
            .get(room)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|id| self.connections.get(id).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of rooms with at least one member
    pub fn room_count(&self) -> usize {
        self.room_connections.len()
    }

    /// Check if a connection exists
    pub fn has_connection(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }

    fn deliver(connection: &Connection, event: &ServerEvent) -> bool {
        match connection.dispatch(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    connection = %connection.id(),
                    event = event.name(),
                    "Outbound queue full, dropping event"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    connection = %connection.id(),
                    event = event.name(),
                    "Connection closed, dropping event"
                );
                false
            }
        }
    }
}

impl RoomOccupancy for ConnectionManager {
    fn live_count(&self, room: &str) -> usize {
        self.room_connections.get(room).map_or(0, |members| members.len())
    }
}

impl Transport for ConnectionManager {
    fn join(&self, connection: &ConnectionId, room: &str) {
        if !self.connections.contains_key(connection) {
            tracing::debug!(connection = %connection, room = %room, "Join for closed connection ignored");
            return;
        }

        self.room_connections
            .entry(room.to_string())
            .or_default()
            .insert(connection.clone());

        tracing::trace!(connection = %connection, room = %room, "Joined room group");
    }

    fn leave(&self, connection: &ConnectionId, room: &str) {
        self.room_connections.alter(room, |_, mut members| {
            members.remove(connection);
            members
        });
        self.room_connections.remove_if(room, |_, members| members.is_empty());

        tracing::trace!(connection = %connection, room = %room, "Left room group");
    }

    fn send_to(&self, connection: &ConnectionId, event: &ServerEvent) {
        if let Some(conn) = self.get_connection(connection) {
            Self::deliver(&conn, event);
        }
    }

    fn broadcast_to(&self, room: &str, event: &ServerEvent, excluding: Option<&ConnectionId>) {
        let mut sent = 0;

        for conn in self.get_room_connections(room) {
            if Some(conn.id()) == excluding {
                continue;
            }
            if Self::deliver(&conn, event) {
                sent += 1;
            }
        }

        tracing::trace!(room = %room, event = event.name(), sent = sent, "Event sent to room");
    }

    fn broadcast_all(&self, event: &ServerEvent) {
        let connections: Vec<Arc<Connection>> =
            self.connections.iter().map(|r| r.value().clone()).collect();
        let mut sent = 0;

        for conn in connections {
            if Self::deliver(&conn, event) {
                sent += 1;
            }
        }

        tracing::trace!(event = event.name(), sent = sent, "Event broadcast to all connections");
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("rooms", &self.room_connections.len())
            .finish()
    }
}
