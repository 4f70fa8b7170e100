//! Heartbeat handler (op 1)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage};

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Handle a heartbeat from the client
    ///
    /// The `last_sequence` is the client's last received sequence number (or None if none received).
    pub fn handle(
        connection: &Connection,
        last_sequence: Option<u64>,
    ) -> HandlerResult<Option<CloseCode>> {
        connection.record_heartbeat();

        tracing::trace!(
            connection = %connection.id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        if let Err(e) = connection.try_send(GatewayMessage::heartbeat_ack()) {
            tracing::warn!(
                connection = %connection.id(),
                error = %e,
                "Failed to send heartbeat ACK"
            );
        }

        Ok(None)
    }
}
