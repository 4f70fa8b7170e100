//! Session services
//!
//! The coordinator is the only component allowed to mutate chat state.

pub mod error;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ServiceError, ServiceResult};
pub use session::{SessionCoordinator, SessionPhase};
