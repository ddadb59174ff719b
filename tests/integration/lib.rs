//! Shared fakes and helpers for the integration test binaries.

use async_trait::async_trait;
use coachd_agent::{AgentLoop, RecordStore, ToolRegistry, WebSearchConfig};
use coachd_core::{ChatMessage, ToolDefinition, TurnEvent};
use coachd_providers::{CompletionClient, ContentStream, Decision, ProviderError};
use coachd_store::SessionStore;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Completion client that replays a scripted list of decisions.
///
/// Every `stream_final` call streams `final_text` in two chunks. Calls to
/// history are recorded so tests can assert on what the model saw.
pub struct ScriptedClient {
    decisions: Mutex<Vec<Decision>>,
    final_text: String,
    /// Message snapshots from each `decide` call.
    pub decide_calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn new(mut decisions: Vec<Decision>, final_text: impl Into<String>) -> Self {
        decisions.reverse();
        Self {
            decisions: Mutex::new(decisions),
            final_text: final_text.into(),
            decide_calls: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a client that answers immediately.
    pub fn answering(final_text: impl Into<String>) -> Self {
        Self::new(
            vec![Decision::Answer {
                content: String::new(),
            }],
            final_text,
        )
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn decide(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> coachd_providers::Result<Decision> {
        self.decide_calls.lock().unwrap().push(messages.to_vec());
        self.decisions
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| ProviderError::stream("script exhausted"))
    }

    async fn stream_final(
        &self,
        _messages: &[ChatMessage],
    ) -> coachd_providers::Result<ContentStream> {
        let text = self.final_text.clone();
        let mid = text.len() / 2;
        let chunks = vec![text[..mid].to_string(), text[mid..].to_string()];
        Ok(Box::pin(futures::stream::iter(
            chunks.into_iter().filter(|c| !c.is_empty()).map(Ok),
        )))
    }
}

/// Build an agent loop over the given store with the default tool catalog.
pub fn agent_with(store: Arc<dyn SessionStore>, client: ScriptedClient) -> AgentLoop {
    agent_with_shared(store, Arc::new(client))
}

/// Like [`agent_with`], but keeps the caller's handle to the client so
/// tests can inspect the recorded `decide` calls.
pub fn agent_with_shared(store: Arc<dyn SessionStore>, client: Arc<ScriptedClient>) -> AgentLoop {
    let registry = Arc::new(ToolRegistry::with_defaults(
        Arc::new(RecordStore::new()),
        WebSearchConfig::default(),
    ));
    AgentLoop::new(store, client, registry)
}

/// Drain a turn's event stream.
pub async fn collect_events(mut rx: mpsc::Receiver<TurnEvent>) -> Vec<TurnEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

/// Event type names, in order.
pub fn event_types(events: &[TurnEvent]) -> Vec<&'static str> {
    events.iter().map(|e| e.event_type()).collect()
}
