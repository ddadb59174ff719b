//! HTTP/SSE gateway for coachd.
//!
//! This crate provides:
//! - `POST /v1/chat` — one conversational turn, streamed as SSE
//! - Session listing and history endpoints
//! - Health check

pub mod error;
pub mod handlers;
pub mod server;

pub use error::GatewayError;
pub use server::{build_router, serve, AppState};

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
