//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when the wiring is broken. All routing
//! ambiguity is caught here: a compiled graph can only ever transition to a
//! registered node or END.

use thiserror::Error;

/// Error when compiling a state graph.
///
/// Validation ensures the entry edge exists, every edge and router target
/// names a registered node (or END), each node has exactly one outgoing
/// route, and no node is left without a way forward.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// An edge or router target names a node that was never registered.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge from START, so the graph has no entry node.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// A node has more than one outgoing edge/router.
    #[error("node has more than one outgoing route: {0}")]
    DuplicateRoute(String),

    /// A registered node has no outgoing edge or router; a run reaching it
    /// would have nowhere to go.
    #[error("node has no outgoing route: {0}")]
    MissingRoute(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of each variant names the offending node where
    /// one is involved.
    #[test]
    fn display_names_offending_node() {
        assert!(CompilationError::NodeNotFound("ghost".into())
            .to_string()
            .contains("ghost"));
        assert!(CompilationError::DuplicateRoute("worker".into())
            .to_string()
            .contains("worker"));
        assert!(CompilationError::MissingRoute("tools".into())
            .to_string()
            .contains("tools"));
        assert!(CompilationError::MissingStart
            .to_string()
            .contains("START"));
    }
}
