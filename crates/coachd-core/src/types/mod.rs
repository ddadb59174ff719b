//! Common type definitions shared across coachd crates.

mod event;
mod identifiers;
mod message;
mod session;
mod tool;

pub use event::TurnEvent;
pub use identifiers::{OwnerId, SessionId};
pub use message::{ChatMessage, Role};
pub use session::Session;
pub use tool::{ToolCallKind, ToolCallRequest, ToolDefinition, ToolOutcome};
