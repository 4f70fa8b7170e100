//! Outbound events

mod server_event;

pub use server_event::{format_time, MessagePayload, ServerEvent};
