//! # coachd-core
//!
//! Core types, configuration, and utilities for coachd.
//!
//! This crate provides shared functionality used across all coachd crates:
//!
//! - **Types**: Common type definitions for messages, sessions, tools, and turn events
//! - **Configuration**: Loading, validation, and management of config files
//! - **Utilities**: ID generation helpers

pub mod config;
pub mod error;
pub mod id;
pub mod types;

// Re-exports for convenience
pub use config::{Config, StoreKind};
pub use error::{Error, Result};
pub use types::*;
