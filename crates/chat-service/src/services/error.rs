//! Service layer error types

use chat_core::DomainError;
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Event arrived in a session state that does not accept it
    InvalidTransition {
        event: &'static str,
        state: &'static str,
    },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::InvalidTransition { event, state } => {
                write!(f, "Event {event} is not valid in state {state}")
            }
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::InvalidTransition { .. } => None,
        }
    }
}

impl ServiceError {
    /// Create an invalid transition error
    pub fn invalid_transition(event: &'static str, state: &'static str) -> Self {
        Self::InvalidTransition { event, state }
    }

    /// Get the error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }

    /// True for events that are dropped without telling anyone
    pub fn is_silent(&self) -> bool {
        match self {
            Self::Domain(e) => !e.is_nickname_rejection(),
            Self::InvalidTransition { .. } => true,
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
