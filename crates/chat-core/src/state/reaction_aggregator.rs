//! Reaction aggregator - one live reaction per participant per message

use crate::error::DomainError;
use crate::state::HistoryStore;
use crate::value_objects::{ConnectionId, MessageId};

/// Outcome of asserting a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionDelta {
    pub message_id: MessageId,
    pub added: String,
    pub removed: Option<String>,
}

impl ReactionDelta {
    /// True when the participant re-asserted the symbol they already had
    pub fn is_unchanged(&self) -> bool {
        self.removed.as_deref() == Some(self.added.as_str())
    }
}

/// Applies reaction assertions to messages held in the history store
pub struct ReactionAggregator;

impl ReactionAggregator {
    /// Make `symbol` the participant's reaction on a message
    ///
    /// Any previous reaction by the same participant is superseded and
    /// reported in `removed`. A message that is not in the room's history
    /// is left alone and reported as `UnknownMessageId`.
    pub fn assert_reaction(
        history: &mut HistoryStore,
        room: &str,
        message_id: MessageId,
        participant: &ConnectionId,
        symbol: &str,
    ) -> Result<ReactionDelta, DomainError> {
        if symbol.trim().is_empty() {
            return Err(DomainError::EmptyReaction);
        }

        let message = history.find_by_id_mut(room, message_id)?;
        let removed = message.set_reaction(participant.clone(), symbol.to_string());

        Ok(ReactionDelta {
            message_id,
            added: symbol.to_string(),
            removed,
        })
    }
}
