//! Gateway server setup
//!
//! Provides the main WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::connection::ConnectionManager;
use axum::{extract::State, routing::get, Json, Router};
use chat_common::{AppConfig, AppError};
use chat_core::RoomSummary;
use chat_service::SessionCoordinator;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
        .route("/rooms", get(list_rooms))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Current rooms with live occupancy
async fn list_rooms(State(state): State<GatewayState>) -> Json<Vec<RoomSummary>> {
    Json(state.coordinator().room_list())
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the connection manager and coordinator together
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    let connection_manager = ConnectionManager::new_shared();
    let coordinator = Arc::new(SessionCoordinator::new(
        connection_manager.clone(),
        &config.chat,
    ));

    tracing::debug!(
        default_room = %config.chat.default_room,
        history_limit = config.chat.history_limit,
        max_nickname_length = config.chat.max_nickname_length,
        "Session coordinator ready"
    );

    GatewayState::new(coordinator, connection_manager, config)
}

/// Serve the gateway on an already bound listener until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), AppError> {
    let addr = listener.local_addr().map_err(AppError::internal)?;
    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(AppError::Serve)
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();
    tracing::info!("Starting Gateway server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;

    let state = create_gateway_state(config);

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
