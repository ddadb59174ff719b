//! The bounded agent loop.

use crate::dispatcher::ToolDispatcher;
use crate::error::{AgentError, Result};
use crate::history::TurnLog;
use crate::tools::{display_label, CallerIdentity, ToolRegistry};
use coachd_core::{ChatMessage, Session, TurnEvent};
use coachd_providers::{CompletionClient, Decision};
use coachd_store::SessionStore;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Default system prompt for the standard assistant loop.
const ASSISTANT_PROMPT: &str = "You are a personal fitness coach. Use the available tools \
to read and update the user's training records before answering. Be specific, encouraging, \
and honest; never invent data you did not read from a tool.";

/// Default system prompt for the guided intake loop.
const INTAKE_PROMPT: &str = "You are onboarding a new user as their fitness coach. Ask about \
their goals, experience level, weekly schedule, available equipment, and any limitations. \
Save what you learn with update_profile as you go, and call complete_intake once you have \
everything you need.";

/// Per-call-site configuration of the agent loop.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// System prompt injected at the head of the working history.
    pub system_prompt: String,

    /// Maximum tool rounds before the turn fails.
    pub max_iterations: usize,

    /// Tool whose successful outcome triggers a milestone event after
    /// `Done`.
    pub milestone_tool: Option<String>,
}

impl LoopConfig {
    /// Configuration for the standard assistant endpoint.
    pub fn assistant() -> Self {
        Self {
            system_prompt: ASSISTANT_PROMPT.to_string(),
            max_iterations: 5,
            milestone_tool: None,
        }
    }

    /// Configuration for guided intake: a higher cap for the longer
    /// back-and-forth, and a milestone when intake completes.
    pub fn guided_intake() -> Self {
        Self {
            system_prompt: INTAKE_PROMPT.to_string(),
            max_iterations: 10,
            milestone_tool: Some("complete_intake".to_string()),
        }
    }

    /// Override the iteration cap.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Override the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

/// One inbound turn.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Session the turn belongs to.
    pub session: Session,

    /// The user's message.
    pub message: String,

    /// Synthetic messages drive the model but are not persisted as user
    /// messages (e.g. the kickoff message of guided intake).
    pub synthetic: bool,
}

/// The agent loop: decide, dispatch tools, stream the final answer.
///
/// `run_turn` spawns the turn and returns a receiver of [`TurnEvent`]s.
/// Dropping the receiver cancels the turn at its next suspension point.
#[derive(Clone)]
pub struct AgentLoop {
    store: Arc<dyn SessionStore>,
    client: Arc<dyn CompletionClient>,
    registry: Arc<ToolRegistry>,
    dispatcher: ToolDispatcher,
}

impl AgentLoop {
    /// Create a loop over a store, completion client, and tool registry.
    pub fn new(
        store: Arc<dyn SessionStore>,
        client: Arc<dyn CompletionClient>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        let dispatcher = ToolDispatcher::new(registry.clone());
        Self {
            store,
            client,
            registry,
            dispatcher,
        }
    }

    /// Run one turn, streaming events to the returned receiver.
    ///
    /// Every stream starts with `Session` and ends with `Done` or `Error`
    /// (unless cancelled); a `Milestone` may follow `Done`.
    pub fn run_turn(
        &self,
        request: TurnRequest,
        config: LoopConfig,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel(32);
        let this = self.clone();

        tokio::spawn(async move {
            let session_id = request.session.id.clone();
            if let Err(e) = this.run_inner(request, config, cancel, &tx).await {
                error!(session_id = %session_id, error = %e, "Turn failed");
                let _ = tx
                    .send(TurnEvent::Error {
                        message: e.to_string(),
                    })
                    .await;
            }
        });

        rx
    }

    async fn run_inner(
        &self,
        request: TurnRequest,
        config: LoopConfig,
        cancel: CancellationToken,
        tx: &mpsc::Sender<TurnEvent>,
    ) -> Result<()> {
        let session = request.session;
        let caller = CallerIdentity {
            owner_id: session.owner_id.clone(),
            session_id: session.id.clone(),
        };

        if !send(tx, TurnEvent::Session {
            session_id: session.id.clone(),
        })
        .await
        {
            return Ok(());
        }

        let prior = self.store.load_history(&session.id).await?;

        let user_msg = ChatMessage::user(session.id.clone(), request.message);
        if !request.synthetic {
            self.store.append_message(user_msg.clone()).await?;
        }

        let mut log = TurnLog::new(Vec::new()).with_message(ChatMessage::system(
            session.id.clone(),
            config.system_prompt.clone(),
        ));
        for msg in prior {
            log = log.with_message(msg);
        }
        log = log.with_message(user_msg);

        let definitions = self.registry.definitions();
        let mut milestone_hit = false;
        let mut rounds = 0;

        loop {
            if cancel.is_cancelled() {
                debug!(session_id = %session.id, "Turn cancelled before decision");
                return Ok(());
            }

            let decision = self.client.decide(log.messages(), &definitions).await?;

            let (content, requests) = match decision {
                // An answer with no tool calls ends the loop, even when
                // the content is empty.
                Decision::Answer { .. } => break,
                Decision::ToolCalls { requests, .. } if requests.is_empty() => break,
                Decision::ToolCalls { content, requests } => (content, requests),
            };

            rounds += 1;

            debug!(
                session_id = %session.id,
                round = rounds,
                calls = requests.len(),
                "Dispatching tool round"
            );

            let assistant_msg = ChatMessage::assistant_with_tool_calls(
                session.id.clone(),
                content,
                requests.clone(),
            );
            self.store.append_message(assistant_msg.clone()).await?;
            log = log.with_tool_calls(assistant_msg);

            for call in &requests {
                if cancel.is_cancelled() {
                    debug!(session_id = %session.id, "Turn cancelled mid-dispatch");
                    return Ok(());
                }

                if !send(tx, TurnEvent::ToolStart {
                    id: call.id.clone(),
                    label: display_label(&call.name),
                })
                .await
                {
                    return Ok(());
                }

                let outcome = self.dispatcher.dispatch(call, &caller).await;

                if !outcome.is_error
                    && config.milestone_tool.as_deref() == Some(call.name.as_str())
                {
                    milestone_hit = true;
                }

                if !send(tx, TurnEvent::ToolEnd {
                    id: call.id.clone(),
                    is_error: outcome.is_error,
                })
                .await
                {
                    return Ok(());
                }

                log = log.with_message(ChatMessage::tool_result(
                    session.id.clone(),
                    &call.id,
                    outcome.payload.to_string(),
                ));
            }

            // The cap counts decision steps. Once the last allowed round
            // has been dispatched, the turn fails without asking the model
            // again, even if it would have answered next.
            if rounds >= config.max_iterations {
                return Err(AgentError::IterationLimitExceeded {
                    max: config.max_iterations,
                });
            }
        }

        if cancel.is_cancelled() {
            return Ok(());
        }

        // The tool catalog is omitted here: the model can only answer.
        let mut stream = self.client.stream_final(log.messages()).await?;
        let mut final_content = String::new();

        while let Some(item) = stream.next().await {
            if cancel.is_cancelled() {
                debug!(session_id = %session.id, "Turn cancelled mid-stream");
                return Ok(());
            }
            let delta = item?;
            final_content.push_str(&delta);
            if !send(tx, TurnEvent::Content { delta }).await {
                return Ok(());
            }
        }

        if !send(tx, TurnEvent::Done).await {
            return Ok(());
        }

        let calls = log.into_tool_calls();
        let final_msg = if calls.is_empty() {
            ChatMessage::assistant(session.id.clone(), final_content)
        } else {
            ChatMessage::assistant_with_tool_calls(session.id.clone(), final_content, calls)
        };
        self.store.append_message(final_msg).await?;

        if milestone_hit {
            if let Some(name) = config.milestone_tool {
                info!(session_id = %session.id, milestone = %name, "Milestone reached");
                let _ = send(tx, TurnEvent::Milestone { name }).await;
            }
        }

        Ok(())
    }
}

/// Send an event; `false` means the receiver is gone and the turn should
/// stop quietly.
async fn send(tx: &mpsc::Sender<TurnEvent>, event: TurnEvent) -> bool {
    tx.send(event).await.is_ok()
}
