//! Agent loop, tool registry, and tool dispatcher for coachd.
//!
//! The centerpiece is [`AgentLoop`]: a bounded decide/dispatch loop that
//! streams [`coachd_core::TurnEvent`]s while the model works, isolates tool
//! failures from the turn itself, and persists the conversation through a
//! [`coachd_store::SessionStore`].

pub mod dispatcher;
pub mod error;
pub mod history;
pub mod runtime;
pub mod tools;

pub use dispatcher::ToolDispatcher;
pub use error::{AgentError, Result};
pub use history::TurnLog;
pub use runtime::{AgentLoop, LoopConfig, TurnRequest};
pub use tools::{CallerIdentity, RecordStore, Tool, ToolError, ToolRegistry, WebSearchConfig};
