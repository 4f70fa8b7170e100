//! Handler error types

use crate::protocol::{CloseCode, EventParseError};
use chat_service::ServiceError;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Event payload could not be decoded
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] EventParseError),

    /// The coordinator rejected the event
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl HandlerError {
    /// Convert to a close code (if applicable)
    ///
    /// Bad event payloads and rejected events leave the socket open; only
    /// frame-level violations, handled before dispatch, close it.
    pub fn to_close_code(&self) -> Option<CloseCode> {
        match self {
            Self::InvalidPayload(_) | Self::Service(_) => None,
        }
    }

    /// Stable code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::Service(e) => e.error_code(),
        }
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
