//! HTTP server setup.

use crate::handlers;
use crate::Result;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use coachd_agent::AgentLoop;
use coachd_core::Config;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for all handlers.
pub struct AppState {
    /// The agent loop every chat turn runs through.
    pub agent: AgentLoop,

    /// Session store, shared with the agent.
    pub store: Arc<dyn coachd_store::SessionStore>,

    /// Loaded configuration.
    pub config: Config,
}

/// Build the gateway router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/v1/chat", post(handlers::chat::chat))
        .route("/v1/sessions/:id", get(handlers::sessions::get_session))
        .route(
            "/v1/sessions/:id/messages",
            get(handlers::sessions::get_messages),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        state.config.gateway.bind, state.config.gateway.port
    )
    .parse()
    .map_err(|e| crate::GatewayError::Internal(format!("Invalid bind address: {}", e)))?;

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Gateway listening");

    axum::serve(listener, router).await?;
    Ok(())
}
