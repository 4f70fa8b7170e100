//! Session coordinator
//!
//! Drives every connection through `Anonymous -> Active -> Disconnected`,
//! applies the change to the nickname registry, room directory, history
//! store and reaction aggregator, and tells the transport who must hear
//! about it.
//!
//! All state sits behind one mutex. Broadcasts are issued while it is held,
//! so every client observes events in the order the state changed and
//! snapshots (room lists, history) are never torn. Transport calls are
//! non-blocking, which keeps the critical section short.

use std::collections::HashMap;
use std::sync::Arc;

use chat_common::ChatConfig;
use chat_core::{
    ConnectionId, DomainError, HistoryStore, Message, MessageId, MessageIdGenerator,
    MessagePayload, NicknameRegistry, Participant, ReactionAggregator, ReactionDelta, Room,
    RoomDirectory, RoomOccupancy, RoomSummary, ServerEvent, Transport,
};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, trace};

use super::error::{ServiceError, ServiceResult};
use crate::dto::{ChangeRoomRequest, ChatMessageRequest, JoinRoomRequest, ReactionRequest};

/// Where a connection is in its lifecycle
///
/// A connection the coordinator does not know is `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Anonymous,
    Active,
    Disconnected,
}

impl SessionPhase {
    fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "Anonymous",
            Self::Active => "Active",
            Self::Disconnected => "Disconnected",
        }
    }
}

#[derive(Debug)]
enum Session {
    Anonymous,
    Active(Participant),
}

#[derive(Debug)]
struct ChatState {
    sessions: HashMap<ConnectionId, Session>,
    nicknames: NicknameRegistry,
    rooms: RoomDirectory,
    history: HistoryStore,
}

impl ChatState {
    fn phase(&self, connection: &ConnectionId) -> SessionPhase {
        match self.sessions.get(connection) {
            None => SessionPhase::Disconnected,
            Some(Session::Anonymous) => SessionPhase::Anonymous,
            Some(Session::Active(_)) => SessionPhase::Active,
        }
    }

    /// The participant behind an `Active` connection
    fn participant_mut(
        &mut self,
        connection: &ConnectionId,
        event: &'static str,
    ) -> ServiceResult<&mut Participant> {
        let phase = self.phase(connection);
        match self.sessions.get_mut(connection) {
            Some(Session::Active(participant)) => Ok(participant),
            _ => Err(ServiceError::invalid_transition(event, phase.as_str())),
        }
    }
}

/// Owns all chat state and routes events through the transport
pub struct SessionCoordinator {
    transport: Arc<dyn Transport>,
    state: Mutex<ChatState>,
    message_ids: MessageIdGenerator,
}

impl SessionCoordinator {
    /// Create a coordinator with empty state
    pub fn new(transport: Arc<dyn Transport>, config: &ChatConfig) -> Self {
        Self {
            transport,
            state: Mutex::new(ChatState {
                sessions: HashMap::new(),
                nicknames: NicknameRegistry::new(config.max_nickname_length),
                rooms: RoomDirectory::new(config.default_room.clone()),
                history: HistoryStore::new(config.history_limit),
            }),
            message_ids: MessageIdGenerator::new(),
        }
    }

    /// A new connection arrived; it starts `Anonymous` and gets the room list
    #[instrument(skip(self))]
    pub fn connect(&self, connection: &ConnectionId) {
        let mut state = self.state.lock();
        state
            .sessions
            .entry(connection.clone())
            .or_insert(Session::Anonymous);

        let rooms = state.rooms.list_with_counts(&self.occupancy());
        self.transport
            .send_to(connection, &ServerEvent::RoomList(rooms));

        debug!("Session opened");
    }

    /// Claim a nickname and enter a room
    #[instrument(skip(self, request))]
    pub fn join_room(
        &self,
        connection: &ConnectionId,
        request: JoinRoomRequest,
    ) -> ServiceResult<()> {
        let mut state = self.state.lock();

        let phase = state.phase(connection);
        if phase != SessionPhase::Anonymous {
            return Err(ServiceError::invalid_transition("joinRoom", phase.as_str()));
        }

        let nickname = request.nickname;
        let room = Room::resolve_name(&request.room, state.rooms.default_room());

        if let Err(e) = state.nicknames.claim(&nickname) {
            debug!(nickname = %nickname, reason = e.code(), "Nickname rejected");
            self.transport
                .send_to(connection, &ServerEvent::NicknameError(e.to_string()));
            return Err(e.into());
        }

        self.transport
            .send_to(connection, &ServerEvent::NicknameAccepted);

        self.transport.join(connection, &room);
        state.rooms.ensure_exists(&room);
        state.sessions.insert(
            connection.clone(),
            Session::Active(Participant::new(
                connection.clone(),
                nickname.clone(),
                room.clone(),
            )),
        );

        self.broadcast_room_list(&state);
        self.transport.broadcast_to(
            &room,
            &ServerEvent::notice(format!("{nickname} joined the room.")),
            Some(connection),
        );
        self.transport
            .send_to(connection, &ServerEvent::history(&state.history.get(&room)));

        info!(nickname = %nickname, room = %room, "Participant joined");
        Ok(())
    }

    /// Move an active participant to another room
    #[instrument(skip(self, request))]
    pub fn change_room(
        &self,
        connection: &ConnectionId,
        request: ChangeRoomRequest,
    ) -> ServiceResult<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let new_room = Room::resolve_name(&request.new_room, state.rooms.default_room());
        let participant = state.participant_mut(connection, "changeRoom")?;

        if participant.is_in(&new_room) {
            debug!(room = %new_room, "Already in requested room");
            return Ok(());
        }

        if let Some(claimed) = request.old_room.as_deref() {
            if claimed != participant.room {
                debug!(
                    claimed = %claimed,
                    actual = %participant.room,
                    "Client reported a stale room"
                );
            }
        }

        let old_room = std::mem::replace(&mut participant.room, new_room.clone());
        let nickname = participant.nickname.clone();

        self.transport.leave(connection, &old_room);
        self.transport.join(connection, &new_room);
        state.rooms.ensure_exists(&new_room);

        self.transport.broadcast_to(
            &old_room,
            &ServerEvent::notice(format!("{nickname} left the room.")),
            Some(connection),
        );
        self.transport.broadcast_to(
            &new_room,
            &ServerEvent::notice(format!("{nickname} joined the room.")),
            Some(connection),
        );
        self.transport.send_to(
            connection,
            &ServerEvent::history(&state.history.get(&new_room)),
        );

        state
            .rooms
            .prune_empty(&self.occupancy(), &mut state.history);
        self.broadcast_room_list(state);

        info!(nickname = %nickname, from = %old_room, to = %new_room, "Participant switched rooms");
        Ok(())
    }

    /// Post a message to the sender's room, sender included
    #[instrument(skip(self, request))]
    pub fn chat_message(
        &self,
        connection: &ConnectionId,
        request: ChatMessageRequest,
    ) -> ServiceResult<MessageId> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let participant = state.participant_mut(connection, "chatMessage")?;
        if request.is_empty() {
            return Err(DomainError::EmptyMessage.into());
        }

        let message = Message::new(
            self.message_ids.generate(),
            participant.room.clone(),
            participant.nickname.clone(),
            request.message,
            request.image,
        )?;
        let id = message.id;

        self.transport.broadcast_to(
            &message.room,
            &ServerEvent::Message(MessagePayload::from(&message)),
            None,
        );

        trace!(
            room = %message.room,
            nickname = %message.sender,
            id = %id,
            image = message.has_image(),
            "Message posted"
        );

        state.history.append(message);
        Ok(id)
    }

    /// Tell the rest of the room that the sender is typing
    #[instrument(skip(self))]
    pub fn typing(&self, connection: &ConnectionId) -> ServiceResult<()> {
        let mut state = self.state.lock();
        let participant = state.participant_mut(connection, "typing")?;

        self.transport.broadcast_to(
            &participant.room,
            &ServerEvent::Typing {
                nickname: participant.nickname.clone(),
            },
            Some(connection),
        );
        Ok(())
    }

    /// Set the sender's reaction on a message in their room
    ///
    /// Re-asserting the reaction already in place changes nothing and is not
    /// broadcast.
    #[instrument(skip(self, request))]
    pub fn reaction(
        &self,
        connection: &ConnectionId,
        request: ReactionRequest,
    ) -> ServiceResult<ReactionDelta> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let room = state.participant_mut(connection, "reaction")?.room.clone();
        let delta = ReactionAggregator::assert_reaction(
            &mut state.history,
            &room,
            request.message_id,
            connection,
            &request.reaction,
        )?;

        if delta.is_unchanged() {
            trace!(message_id = %delta.message_id, "Reaction unchanged");
            return Ok(delta);
        }

        if let Some(removed) = &delta.removed {
            self.transport.broadcast_to(
                &room,
                &ServerEvent::ReactionRemoved {
                    message_id: delta.message_id,
                    reaction: removed.clone(),
                },
                None,
            );
        }
        self.transport.broadcast_to(
            &room,
            &ServerEvent::Reaction {
                message_id: delta.message_id,
                reaction: delta.added.clone(),
            },
            None,
        );

        trace!(
            message_id = %delta.message_id,
            added = %delta.added,
            removed = ?delta.removed,
            "Reaction applied"
        );
        Ok(delta)
    }

    /// The connection went away
    ///
    /// Safe to call more than once; returns true only when an active
    /// participant was removed.
    #[instrument(skip(self))]
    pub fn disconnect(&self, connection: &ConnectionId) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let participant = match state.sessions.remove(connection) {
            Some(Session::Active(participant)) => participant,
            Some(Session::Anonymous) => {
                debug!("Anonymous session closed");
                return false;
            }
            None => return false,
        };

        state.nicknames.release(&participant.nickname);
        self.transport.leave(connection, &participant.room);

        self.transport.broadcast_to(
            &participant.room,
            &ServerEvent::notice(format!("{} left the chat.", participant.nickname)),
            None,
        );

        state
            .rooms
            .prune_empty(&self.occupancy(), &mut state.history);
        self.broadcast_room_list(state);

        info!(nickname = %participant.nickname, room = %participant.room, "Participant left");
        true
    }

    /// Current room list with live counts
    pub fn room_list(&self) -> Vec<RoomSummary> {
        let state = self.state.lock();
        state.rooms.list_with_counts(&self.occupancy())
    }

    /// Lifecycle phase of a connection
    pub fn phase(&self, connection: &ConnectionId) -> SessionPhase {
        self.state.lock().phase(connection)
    }

    /// The participant behind a connection, if it has joined
    pub fn participant(&self, connection: &ConnectionId) -> Option<Participant> {
        match self.state.lock().sessions.get(connection) {
            Some(Session::Active(participant)) => Some(participant.clone()),
            _ => None,
        }
    }

    /// Snapshot of a room's history
    pub fn history(&self, room: &str) -> Vec<Message> {
        self.state.lock().history.get(room)
    }

    /// Number of active participants
    pub fn participant_count(&self) -> usize {
        self.state.lock().nicknames.len()
    }

    fn occupancy(&self) -> impl Fn(&str) -> usize + '_ {
        move |room: &str| self.transport.live_count(room)
    }

    fn broadcast_room_list(&self, state: &ChatState) {
        let rooms = state.rooms.list_with_counts(&self.occupancy());
        self.transport.broadcast_all(&ServerEvent::RoomList(rooms));
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("participants", &self.participant_count())
            .finish_non_exhaustive()
    }
}
