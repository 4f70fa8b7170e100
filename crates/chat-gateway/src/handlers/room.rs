//! Room events: `joinRoom` and `changeRoom`

use super::HandlerResult;
use crate::connection::Connection;
use crate::server::GatewayState;
use chat_service::{ChangeRoomRequest, JoinRoomRequest};

/// Handles room membership events
pub struct RoomHandler;

impl RoomHandler {
    /// Claim a nickname and enter a room
    pub fn join(
        state: &GatewayState,
        connection: &Connection,
        request: JoinRoomRequest,
    ) -> HandlerResult<()> {
        state.coordinator().join_room(connection.id(), request)?;
        Ok(())
    }

    /// Switch to another room
    pub fn change(
        state: &GatewayState,
        connection: &Connection,
        request: ChangeRoomRequest,
    ) -> HandlerResult<()> {
        state.coordinator().change_room(connection.id(), request)?;
        Ok(())
    }
}
