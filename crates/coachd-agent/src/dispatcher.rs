//! Tool dispatch with failure isolation.

use crate::tools::{CallerIdentity, ToolRegistry};
use coachd_core::{ToolCallKind, ToolCallRequest, ToolOutcome};
use std::sync::Arc;
use tracing::{debug, warn};

/// Executes tool calls against the registry.
///
/// Dispatch never fails: unknown tools, unsupported call kinds, and tool
/// execution errors all become error outcomes the model can read, so one
/// bad call cannot take down the turn.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
}

impl ToolDispatcher {
    /// Create a dispatcher over a registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Execute a single tool call.
    pub async fn dispatch(
        &self,
        request: &ToolCallRequest,
        caller: &CallerIdentity,
    ) -> ToolOutcome {
        if let ToolCallKind::Other(kind) = &request.kind {
            warn!(id = %request.id, %kind, "Unsupported tool call kind");
            return ToolOutcome::error(
                &request.id,
                format!("Unsupported tool call type: {}", kind),
            );
        }

        let Some(tool) = self.registry.lookup(&request.name) else {
            warn!(id = %request.id, name = %request.name, "Unknown tool");
            return ToolOutcome::error(
                &request.id,
                format!("Unknown tool: {}", request.name),
            );
        };

        debug!(id = %request.id, name = %request.name, "Dispatching tool call");

        match tool.execute(request.arguments.clone(), caller).await {
            Ok(payload) => ToolOutcome::success(&request.id, payload),
            Err(e) => {
                warn!(id = %request.id, name = %request.name, error = %e, "Tool failed");
                ToolOutcome::error(&request.id, e.to_string())
            }
        }
    }

}
