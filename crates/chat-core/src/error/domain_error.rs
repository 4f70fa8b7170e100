//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::MessageId;

/// Domain layer errors
///
/// The `Display` text of the nickname variants is sent verbatim to the
/// requesting client, so it is worded for people rather than logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Nickname Errors
    // =========================================================================
    #[error("This nickname is already in use. Please choose another one.")]
    NameTaken(String),

    #[error("Nickname cannot exceed {max} characters.")]
    NameTooLong { max: usize },

    #[error("Nickname cannot be empty.")]
    NameEmpty,

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Unknown message id: {0}")]
    UnknownMessageId(MessageId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Message has neither text nor image")]
    EmptyMessage,

    #[error("Reaction symbol cannot be empty")]
    EmptyReaction,
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::NameTaken(_) => "NAME_TAKEN",
            Self::NameTooLong { .. } => "NAME_TOO_LONG",
            Self::NameEmpty => "NAME_EMPTY",
            Self::UnknownMessageId(_) => "UNKNOWN_MESSAGE",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::EmptyReaction => "EMPTY_REACTION",
        }
    }

    /// Check if this is a nickname rejection that the client must be told about
    pub fn is_nickname_rejection(&self) -> bool {
        matches!(
            self,
            Self::NameTaken(_) | Self::NameTooLong { .. } | Self::NameEmpty
        )
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownMessageId(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NameTooLong { .. }
                | Self::NameEmpty
                | Self::EmptyMessage
                | Self::EmptyReaction
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::NameTaken(_))
    }
}
