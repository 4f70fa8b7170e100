//! In-memory chat state components
//!
//! Each component guards one invariant. None of them locks internally; the
//! session coordinator owns all four and serializes access to them.

mod history_store;
mod nickname_registry;
mod reaction_aggregator;
mod room_directory;

pub use history_store::{HistoryStore, DEFAULT_HISTORY_LIMIT};
pub use nickname_registry::{NicknameRegistry, DEFAULT_MAX_NICKNAME_LENGTH, SYSTEM_NICKNAME};
pub use reaction_aggregator::{ReactionAggregator, ReactionDelta};
pub use room_directory::{RoomDirectory, DEFAULT_ROOM};
