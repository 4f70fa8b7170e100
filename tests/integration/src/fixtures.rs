//! Test fixtures and payload views
//!
//! Typed views over the JSON the gateway dispatches.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique nickname that fits the default length limit
pub fn unique_nickname(prefix: &str) -> String {
    let suffix = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{prefix}{suffix}")
}

/// One entry of a `roomList` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomEntry {
    pub name: String,
    pub count: usize,
}

impl RoomEntry {
    pub fn new(name: &str, count: usize) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }
}

/// A `message` payload
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub id: Option<String>,
    pub nickname: String,
    pub message: Option<String>,
    pub image: Option<String>,
    pub time: String,
    pub reactions: Option<BTreeMap<String, Vec<String>>>,
}

/// Decode a `roomList` payload
pub fn room_list(payload: &Value) -> Vec<RoomEntry> {
    serde_json::from_value(payload.clone()).unwrap_or_default()
}

/// Decode a `message` payload
pub fn chat_message(payload: &Value) -> Option<ChatMessage> {
    serde_json::from_value(payload.clone()).ok()
}

/// Decode a `messageHistory` payload
pub fn history(payload: &Value) -> Vec<ChatMessage> {
    serde_json::from_value(payload.clone()).unwrap_or_default()
}
