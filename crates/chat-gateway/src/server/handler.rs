//! WebSocket handler
//!
//! Handles WebSocket connections and message processing.

use crate::connection::Connection;
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chat_core::ConnectionId;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::interval;

/// How long the send task gets to flush a close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let max_payload = state.config().gateway.max_payload_bytes;

    ws.max_message_size(max_payload)
        .max_frame_size(max_payload)
        .on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let gateway = &state.config().gateway;
    let heartbeat_interval = Duration::from_millis(gateway.heartbeat_interval_ms);
    let heartbeat_timeout = heartbeat_interval * 2;

    let connection_id = Connection::generate_id();

    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(gateway.outbound_buffer);

    let connection = state
        .connection_manager()
        .add_connection(connection_id.clone(), tx);

    tracing::info!(connection = %connection_id, "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    // Hello goes out before anything the coordinator queues
    let hello = GatewayMessage::hello(HelloPayload::with_interval(gateway.heartbeat_interval_ms));
    if let Ok(json) = hello.to_json() {
        if ws_sink.send(Message::Text(json)).await.is_err() {
            tracing::warn!(connection = %connection_id, "Failed to send Hello message");
            cleanup_connection(&state, &connection);
            return;
        }
    }

    state.coordinator().connect(&connection_id);

    let (close_tx, close_rx) = oneshot::channel::<CloseCode>();

    // Receive frames from the client
    let state_recv = state.clone();
    let connection_recv = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        let id = connection_recv.id().clone();

        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if let Err(close_code) = handle_text_message(&state_recv, &connection_recv, &text) {
                        tracing::debug!(
                            connection = %id,
                            close_code = ?close_code,
                            "Closing connection due to error"
                        );
                        return Some(close_code);
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(connection = %id, "Binary messages not supported");
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_)) => {
                    tracing::trace!(connection = %id, "Ping received");
                    // Pong is handled automatically by axum
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(connection = %id, "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection = %id, "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(connection = %id, error = %e, "WebSocket error");
                    return None;
                }
            }
        }
        None
    });

    // Write queued frames to the socket
    let id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        let mut close_rx = close_rx;

        loop {
            tokio::select! {
                biased;
                code = &mut close_rx => {
                    let frame = code.ok().map(|code| {
                        let (code, reason) = GatewayMessage::close_frame(code);
                        CloseFrame { code, reason: reason.into() }
                    });
                    let _ = ws_sink.send(Message::Close(frame)).await;
                    break;
                }
                msg = rx.recv() => {
                    let Some(msg) = msg else { break };
                    match msg.to_json() {
                        Ok(json) => {
                            if ws_sink.send(Message::Text(json)).await.is_err() {
                                tracing::warn!(
                                    connection = %id_send,
                                    "Failed to send message to WebSocket"
                                );
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(connection = %id_send, error = %e, "Failed to encode frame");
                            let (code, reason) = GatewayMessage::close_frame(CloseCode::UnknownError);
                            let frame = CloseFrame { code, reason: reason.into() };
                            let _ = ws_sink.send(Message::Close(Some(frame))).await;
                            break;
                        }
                    }
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    // Close connections that stop sending heartbeats
    let connection_hb = connection.clone();
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval(heartbeat_interval / 2);

        loop {
            check_interval.tick().await;

            let time_since = connection_hb.time_since_heartbeat();
            if time_since > heartbeat_timeout {
                tracing::warn!(
                    connection = %connection_hb.id(),
                    time_since_ms = time_since.as_millis(),
                    "Connection timed out (no heartbeat)"
                );
                return CloseCode::SessionTimeout;
            }
        }
    });

    // Wait for any task to complete
    let (close_code, send_finished) = tokio::select! {
        result = &mut recv_task => (result.ok().flatten(), false),
        _ = &mut send_task => {
            tracing::debug!(connection = %connection_id, "Send task ended");
            (None, true)
        }
        result = &mut heartbeat_task => (result.ok(), false),
    };

    recv_task.abort();
    heartbeat_task.abort();

    if !send_finished {
        // A dropped sender closes the socket without a code
        match close_code {
            Some(code) => {
                let _ = close_tx.send(code);
            }
            None => drop(close_tx),
        }
        if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task).await.is_err() {
            send_task.abort();
        }
    }

    cleanup_connection(&state, &connection);
}

/// Handle a text message from the client
fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = match GatewayMessage::from_json(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(
                connection = %connection.id(),
                error = %e,
                "Failed to parse message"
            );
            return Err(CloseCode::DecodeError);
        }
    };

    tracing::trace!(connection = %connection.id(), op = %message.op, "Received message");

    match MessageDispatcher::dispatch(state, connection, message) {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::debug!(
                connection = %connection.id(),
                code = e.error_code(),
                error = %e,
                "Event rejected"
            );
            e.to_close_code().map_or(Ok(()), Err)
        }
    }
}

/// Clean up a connection on disconnect
///
/// The coordinator leaves the room group under its own lock; the registry
/// entry goes only after that, so no other operation sees the room empty
/// while the participant is still active in it.
fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    let id: &ConnectionId = connection.id();

    let was_active = state.coordinator().disconnect(id);
    state.connection_manager().remove_connection(id);

    tracing::info!(
        connection = %id,
        was_active = was_active,
        age_ms = connection.age().as_millis(),
        "Connection closed"
    );
}
