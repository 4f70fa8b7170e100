//! Connection management
//!
//! Tracks WebSocket connections and the room groups they belong to.

mod connection;
mod manager;

pub use connection::Connection;
pub use manager::ConnectionManager;
