//! Agent error types.

use thiserror::Error;

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors that terminate a turn.
///
/// Tool-level failures are not represented here: they become error outcomes
/// inside the turn and never abort it.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Completion client failure.
    #[error("Provider error: {0}")]
    Provider(#[from] coachd_providers::ProviderError),

    /// Session store failure.
    #[error("Store error: {0}")]
    Store(#[from] coachd_store::StoreError),

    /// The decide/dispatch loop hit its iteration cap.
    #[error("Iteration limit exceeded after {max} tool rounds")]
    IterationLimitExceeded { max: usize },
}
