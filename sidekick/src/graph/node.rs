//! Node contract: one named unit of work.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::GraphState;

/// A named processing step: reads the current state, returns a partial
/// update. Nodes hold their own capabilities (LLM client, tool source) and
/// communicate with each other only through state.
///
/// **Interaction**: registered in `StateGraph::add_node`; run by
/// `CompiledStateGraph::invoke`, which merges the returned update through
/// the state's reducer and then evaluates the node's outgoing route.
#[async_trait]
pub trait Node<S: GraphState>: Send + Sync {
    /// Stable node id; must match the id it was registered under.
    fn id(&self) -> &str;

    /// Runs one step. Failures propagate to the run caller; the engine does
    /// not retry and the state keeps its last merged value.
    async fn run(&self, state: &S) -> Result<S::Update, AgentError>;
}
