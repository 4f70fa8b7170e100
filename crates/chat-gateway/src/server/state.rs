//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::ConnectionManager;
use chat_common::AppConfig;
use chat_service::SessionCoordinator;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Owner of all chat state
    coordinator: Arc<SessionCoordinator>,
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        coordinator: Arc<SessionCoordinator>,
        connection_manager: Arc<ConnectionManager>,
        config: AppConfig,
    ) -> Self {
        Self {
            coordinator,
            connection_manager,
            config: Arc::new(config),
        }
    }

    /// Get the session coordinator
    pub fn coordinator(&self) -> &SessionCoordinator {
        &self.coordinator
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("coordinator", &self.coordinator)
            .field("connection_manager", &self.connection_manager)
            .field("config", &"AppConfig")
            .finish()
    }
}
