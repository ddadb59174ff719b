//! Completion client adapters for coachd.
//!
//! The agent loop talks to the model through [`CompletionClient`], which
//! exposes exactly two operations: a non-streamed [`decide`] call made with
//! the tool catalog, and a streamed [`stream_final`] call made without it.
//!
//! [`decide`]: CompletionClient::decide
//! [`stream_final`]: CompletionClient::stream_final

mod error;
pub mod openai;

pub use error::{ProviderError, Result};
pub use openai::OpenAiClient;

use async_trait::async_trait;
use coachd_core::{ChatMessage, ToolCallRequest, ToolDefinition};
use futures::Stream;
use std::pin::Pin;

/// Stream of content deltas for the final answer.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// The outcome of one decision call.
///
/// A response carrying tool calls is always a [`Decision::ToolCalls`];
/// otherwise it is an [`Decision::Answer`], even when the content is empty.
#[derive(Debug, Clone)]
pub enum Decision {
    /// The model answered with text only.
    Answer { content: String },

    /// The model requested tool calls. Any content that arrived alongside
    /// the calls is preserved for persistence.
    ToolCalls {
        content: String,
        requests: Vec<ToolCallRequest>,
    },
}

/// A client for an OpenAI-compatible completion API.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Ask the model to either answer or request tool calls.
    async fn decide(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<Decision>;

    /// Stream the final answer. The tool catalog is deliberately omitted so
    /// the model cannot request further calls.
    async fn stream_final(&self, messages: &[ChatMessage]) -> Result<ContentStream>;
}
