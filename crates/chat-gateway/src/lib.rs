//! # chat-gateway
//!
//! WebSocket gateway for the chat rooms: framing, connection tracking and
//! room groups, feeding client events into the session coordinator.

pub mod connection;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use server::{create_app, create_gateway_state, run, serve, GatewayState};
