//! Run-time error types for graph and node execution.
//!
//! Graph construction errors live in `graph::CompilationError`; checkpoint
//! errors in `memory::CheckpointError`. Everything that can fail while a run
//! is in flight ends up here.

use thiserror::Error;

/// Error returned by `Node::run` and `CompiledStateGraph::invoke`.
///
/// A `Capability` failure leaves the run at its last checkpointed state; the
/// caller may resume by invoking again with the same thread id. The engine
/// does not retry capability calls itself.
#[derive(Debug, Error)]
pub enum AgentError {
    /// An external capability call (LLM, tool, structured output) failed or
    /// timed out. Propagated to the run caller; no automatic retry.
    #[error("capability call failed: {0}")]
    Capability(String),

    /// A node returned a partial update that violates the update contract
    /// (e.g. a tool result without a call id). Programming error; the run
    /// fails immediately and nothing from the update is merged.
    #[error("malformed state update: {0}")]
    MalformedUpdate(String),

    /// The configured step ceiling was reached before the evaluator ended
    /// the run. Only possible when `StateGraph::with_step_limit` was used.
    #[error("step limit of {0} reached before the run terminated")]
    StepLimit(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of Capability contains the failure message.
    #[test]
    fn capability_display_contains_message() {
        let err = AgentError::Capability("llm timed out".to_string());
        let s = err.to_string();
        assert!(s.contains("capability call failed"), "{}", s);
        assert!(s.contains("llm timed out"), "{}", s);
    }

    /// **Scenario**: Display of MalformedUpdate names the broken contract.
    #[test]
    fn malformed_update_display() {
        let err = AgentError::MalformedUpdate("tool result without call id".to_string());
        let s = err.to_string();
        assert!(s.contains("malformed state update"), "{}", s);
        assert!(s.contains("call id"), "{}", s);
    }

    /// **Scenario**: Display of StepLimit carries the configured ceiling.
    #[test]
    fn step_limit_display_contains_ceiling() {
        let err = AgentError::StepLimit(25);
        assert!(err.to_string().contains("25"), "{}", err);
    }
}
