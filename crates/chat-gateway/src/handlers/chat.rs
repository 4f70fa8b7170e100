//! Chat traffic: `chatMessage`, `typing` and `reaction`

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;
use chat_service::{ChatMessageRequest, ReactionRequest};

/// Handles in-room chat events
pub struct ChatHandler;

impl ChatHandler {
    /// Post a text and/or image message
    pub fn message(
        state: &GatewayState,
        connection: &Connection,
        request: ChatMessageRequest,
    ) -> HandlerResult<()> {
        state.coordinator().chat_message(connection.id(), request)?;
        Ok(())
    }

    /// Relay a typing indicator
    pub fn typing(state: &GatewayState, connection: &Connection) -> HandlerResult<()> {
        state.coordinator().typing(connection.id())?;
        Ok(())
    }

    /// Set a reaction on a message
    pub fn reaction(
        state: &GatewayState,
        connection: &Connection,
        request: ReactionRequest,
    ) -> HandlerResult<()> {
        state.coordinator().reaction(connection.id(), request)?;
        Ok(())
    }
}
