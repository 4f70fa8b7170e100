//! In-memory transport that records every delivery

use std::collections::{BTreeSet, HashMap, HashSet};

use chat_core::{ConnectionId, RoomOccupancy, ServerEvent, Transport, SYSTEM_NICKNAME};
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    open: Mutex<BTreeSet<ConnectionId>>,
    groups: Mutex<HashMap<String, HashSet<ConnectionId>>>,
    outbox: Mutex<Vec<(ConnectionId, ServerEvent)>>,
}

impl RecordingTransport {
    /// Register an open connection so `broadcast_all` reaches it
    pub(crate) fn open(&self, connection: &ConnectionId) {
        self.open.lock().insert(connection.clone());
    }

    pub(crate) fn clear(&self) {
        self.outbox.lock().clear();
    }

    pub(crate) fn events_for(&self, connection: &ConnectionId) -> Vec<ServerEvent> {
        self.outbox
            .lock()
            .iter()
            .filter(|(to, _)| to == connection)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub(crate) fn all_events(&self) -> Vec<(ConnectionId, ServerEvent)> {
        self.outbox.lock().clone()
    }

    /// Text of the system notices delivered to a connection
    pub(crate) fn notices_for(&self, connection: &ConnectionId) -> Vec<String> {
        self.events_for(connection)
            .into_iter()
            .filter_map(|event| match event {
                ServerEvent::Message(payload) if payload.nickname == SYSTEM_NICKNAME => {
                    payload.message
                }
                _ => None,
            })
            .collect()
    }

    fn push(&self, connection: &ConnectionId, event: &ServerEvent) {
        self.outbox.lock().push((connection.clone(), event.clone()));
    }
}

impl RoomOccupancy for RecordingTransport {
    fn live_count(&self, room: &str) -> usize {
        self.groups.lock().get(room).map_or(0, HashSet::len)
    }
}

impl Transport for RecordingTransport {
    fn join(&self, connection: &ConnectionId, room: &str) {
        self.groups
            .lock()
            .entry(room.to_string())
            .or_default()
            .insert(connection.clone());
    }

    fn leave(&self, connection: &ConnectionId, room: &str) {
        let mut groups = self.groups.lock();
        if let Some(members) = groups.get_mut(room) {
            members.remove(connection);
            if members.is_empty() {
                groups.remove(room);
            }
        }
    }

    fn send_to(&self, connection: &ConnectionId, event: &ServerEvent) {
        self.push(connection, event);
    }

    fn broadcast_to(&self, room: &str, event: &ServerEvent, excluding: Option<&ConnectionId>) {
        let members: BTreeSet<ConnectionId> = self
            .groups
            .lock()
            .get(room)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default();

        for member in members.iter().filter(|m| Some(*m) != excluding) {
            self.push(member, event);
        }
    }

    fn broadcast_all(&self, event: &ServerEvent) {
        let open = self.open.lock().clone();
        for connection in &open {
            self.push(connection, event);
        }
    }
}
