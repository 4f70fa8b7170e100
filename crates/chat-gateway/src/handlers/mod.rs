//! Op code handlers
//!
//! Handles incoming WebSocket messages based on their operation code.

mod chat;
mod error;
mod heartbeat;
mod room;

pub use chat::ChatHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use room::RoomHandler;

use crate::connection::Connection;
use crate::protocol::{ClientEvent, CloseCode, GatewayMessage, OpCode};
use crate::server::GatewayState;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle an incoming client message
    pub fn dispatch(
        state: &GatewayState,
        connection: &Connection,
        message: GatewayMessage,
    ) -> HandlerResult<Option<CloseCode>> {
        // Validate that this is a client-sendable op code
        if !message.op.is_client_op() {
            tracing::warn!(
                connection = %connection.id(),
                op = %message.op,
                "Received server-only op code from client"
            );
            return Ok(Some(CloseCode::UnknownOpcode));
        }

        if let Some(seq) = message.as_heartbeat_seq() {
            return HeartbeatHandler::handle(connection, seq);
        }

        let Some(event) = message.into_client_event() else {
            tracing::error!(connection = %connection.id(), "Unhandled client op code");
            return Ok(Some(CloseCode::UnknownOpcode));
        };
        let event = event?;

        tracing::trace!(connection = %connection.id(), event = event.name(), "Client event");

        match event {
            ClientEvent::JoinRoom(request) => RoomHandler::join(state, connection, request)?,
            ClientEvent::ChangeRoom(request) => RoomHandler::change(state, connection, request)?,
            ClientEvent::ChatMessage(request) => ChatHandler::message(state, connection, request)?,
            ClientEvent::Typing => ChatHandler::typing(state, connection)?,
            ClientEvent::Reaction(request) => ChatHandler::reaction(state, connection, request)?,
        }

        Ok(None)
    }
}
