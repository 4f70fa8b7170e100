//! Message entity - represents a chat message and its reactions

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::error::DomainError;
use crate::value_objects::{ConnectionId, MessageId};

/// Message entity
///
/// Reactions are held as one symbol per participant. Per-symbol counts are
/// always derived from that mapping and never stored separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub room: String,
    pub sender: String,
    pub text: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    reactions: HashMap<ConnectionId, String>,
}

impl Message {
    /// Create a new Message
    ///
    /// Empty strings count as absent; at least one of `text` and `image`
    /// must remain.
    pub fn new(
        id: MessageId,
        room: String,
        sender: String,
        text: Option<String>,
        image: Option<String>,
    ) -> Result<Self, DomainError> {
        let text = text.filter(|t| !t.is_empty());
        let image = image.filter(|i| !i.is_empty());

        if text.is_none() && image.is_none() {
            return Err(DomainError::EmptyMessage);
        }

        Ok(Self {
            id,
            room,
            sender,
            text,
            image,
            created_at: Utc::now(),
            reactions: HashMap::new(),
        })
    }

    /// Check if the message carries an image
    #[inline]
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// The symbol `participant` currently has on this message, if any
    pub fn reaction_of(&self, participant: &ConnectionId) -> Option<&str> {
        self.reactions.get(participant).map(String::as_str)
    }

    /// Record `symbol` as the participant's reaction, returning the one it replaces
    pub fn set_reaction(&mut self, participant: ConnectionId, symbol: String) -> Option<String> {
        self.reactions.insert(participant, symbol)
    }

    /// Number of participants currently reacting with `symbol`
    pub fn reaction_count(&self, symbol: &str) -> usize {
        self.reactions.values().filter(|s| s.as_str() == symbol).count()
    }

    /// Reactions grouped by symbol, each with the sorted participants asserting it
    pub fn reactions(&self) -> BTreeMap<String, Vec<ConnectionId>> {
        let mut grouped: BTreeMap<String, Vec<ConnectionId>> = BTreeMap::new();
        for (participant, symbol) in &self.reactions {
            grouped
                .entry(symbol.clone())
                .or_default()
                .push(participant.clone());
        }
        for participants in grouped.values_mut() {
            participants.sort();
        }
        grouped
    }
}
