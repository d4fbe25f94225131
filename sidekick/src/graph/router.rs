//! Routing: the conditional-edge decision table, evaluated after a node runs.

use crate::graph::GraphState;

/// Destination chosen by a router: a registered node or the terminal
/// sentinel. A closed value; no ad-hoc strings leave the graph layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Next {
    /// Transition to the node registered under this id.
    Node(String),
    /// End the run and hand the final state back to the caller.
    End,
}

impl Next {
    /// Convenience for `Next::Node(id.into())`.
    pub fn node(id: impl Into<String>) -> Self {
        Next::Node(id.into())
    }
}

/// A pure function of state selecting the next node after its source node
/// completes. Determinism is part of the contract: identical state must
/// yield an identical decision.
///
/// `targets` declares every value `route` may return; `StateGraph::compile`
/// checks each against the node registry, so a mis-wired graph fails at
/// construction time rather than mid-run.
pub trait Router<S: GraphState>: Send + Sync {
    /// Decides the next destination for the current state.
    fn route(&self, state: &S) -> Next;

    /// All destinations `route` can produce.
    fn targets(&self) -> Vec<Next>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Next::node builds the Node variant; End compares equal
    /// to itself and unequal to any node.
    #[test]
    fn next_constructors_and_equality() {
        assert_eq!(Next::node("worker"), Next::Node("worker".to_string()));
        assert_ne!(Next::End, Next::node("worker"));
        assert_eq!(Next::End, Next::End);
    }
}
