//! Nickname registry - which display names are currently claimed

use std::collections::HashSet;

use crate::error::DomainError;

/// Sender name used for server-generated notices; never claimable
pub const SYSTEM_NICKNAME: &str = "System";

/// Default upper bound on nickname length, in characters
pub const DEFAULT_MAX_NICKNAME_LENGTH: usize = 16;

/// Tracks the nicknames held by active participants
#[derive(Debug, Clone)]
pub struct NicknameRegistry {
    claimed: HashSet<String>,
    max_length: usize,
}

impl NicknameRegistry {
    /// Create an empty registry enforcing `max_length` characters
    pub fn new(max_length: usize) -> Self {
        Self {
            claimed: HashSet::new(),
            max_length,
        }
    }

    /// Claim `name` for a new participant
    ///
    /// Nothing changes on failure.
    pub fn claim(&mut self, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::NameEmpty);
        }

        if name.chars().count() > self.max_length {
            return Err(DomainError::NameTooLong {
                max: self.max_length,
            });
        }

        if name == SYSTEM_NICKNAME || self.claimed.contains(name) {
            return Err(DomainError::NameTaken(name.to_string()));
        }

        self.claimed.insert(name.to_string());
        Ok(())
    }

    /// Release `name`; releasing an unclaimed name is a no-op
    pub fn release(&mut self, name: &str) -> bool {
        self.claimed.remove(name)
    }

    /// Check if `name` is currently claimed
    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Number of claimed nicknames
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Check if no nickname is claimed
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }

    /// Configured length limit
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for NicknameRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NICKNAME_LENGTH)
    }
}
