//! Message ID - process-wide unique, string-stable message identifier
//!
//! Rendered on the wire as `msg-<n>` where `n` is a counter that starts at
//! zero when the process starts and only ever increases.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

const PREFIX: &str = "msg-";

/// Message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(u64);

impl MessageId {
    /// Create a MessageId from its sequence number
    #[inline]
    pub const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Get the sequence number
    #[inline]
    pub const fn sequence(self) -> u64 {
        self.0
    }

    /// Parse from the `msg-<n>` wire form
    pub fn parse(s: &str) -> Result<Self, MessageIdParseError> {
        s.strip_prefix(PREFIX)
            .and_then(|n| n.parse::<u64>().ok())
            .map(Self)
            .ok_or(MessageIdParseError::InvalidFormat)
    }
}

/// Error when parsing a MessageId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MessageIdParseError {
    #[error("invalid message id format")]
    InvalidFormat,
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.0)
    }
}

impl std::str::FromStr for MessageId {
    type Err = MessageIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageId::parse(s)
    }
}

impl Serialize for MessageId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        MessageId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Hands out message IDs in strictly increasing order
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    next: AtomicU64,
}

impl MessageIdGenerator {
    /// Create a generator whose first ID is `msg-0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next ID
    pub fn generate(&self) -> MessageId {
        MessageId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
