//! State graph builder: nodes, unconditional edges, conditional routers.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` (use
//! `START` for entry and `END` for exit) or `add_conditional_edges(from,
//! router)`, then `compile` or `compile_with_checkpointer` to get a
//! `CompiledStateGraph`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::{CompiledStateGraph, Edge};
use crate::graph::graph_state::GraphState;
use crate::graph::node::Node;
use crate::graph::router::{Next, Router};
use crate::memory::Checkpointer;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)`.
pub const END: &str = "__end__";

enum PendingRoute<S: GraphState> {
    Direct(Next),
    Conditional(Arc<dyn Router<S>>),
}

/// State graph under construction: node registry plus the edge/router table.
///
/// Generic over state type `S`. Every node gets exactly one outgoing route:
/// either a direct edge or a router whose declared targets are validated at
/// `compile()` time, so routing ambiguity is a construction failure, never a
/// run-time one.
pub struct StateGraph<S: GraphState> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    routes: Vec<(String, PendingRoute<S>)>,
    entry: Option<String>,
    step_limit: Option<usize>,
}

impl<S: GraphState> Default for StateGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphState> StateGraph<S> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            routes: Vec::new(),
            entry: None,
            step_limit: None,
        }
    }

    /// Caps the number of node executions per invoke. Off by default: the
    /// base design terminates only through the routers. When the cap is hit
    /// the run fails with `AgentError::StepLimit` after the last completed
    /// node was checkpointed, so it stays resumable.
    pub fn with_step_limit(self, limit: usize) -> Self {
        Self {
            step_limit: Some(limit),
            ..self
        }
    }

    /// Adds a node; id must be unique. Replaces if same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an unconditional edge from `from_id` to `to_id`.
    ///
    /// `add_edge(START, id)` sets the entry node; `add_edge(id, END)` makes
    /// the node terminal. All ids except the sentinels must be registered
    /// via `add_node` before `compile()`.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        let from = from_id.into();
        let to = to_id.into();
        if from == START {
            self.entry = Some(to);
            return self;
        }
        let next = if to == END { Next::End } else { Next::Node(to) };
        self.routes.push((from, PendingRoute::Direct(next)));
        self
    }

    /// Adds a conditional route: after `from_id` runs, `router.route(state)`
    /// picks the next node. Every value in `router.targets()` must name a
    /// registered node or `Next::End`.
    pub fn add_conditional_edges(
        &mut self,
        from_id: impl Into<String>,
        router: Arc<dyn Router<S>>,
    ) -> &mut Self {
        self.routes
            .push((from_id.into(), PendingRoute::Conditional(router)));
        self
    }

    /// Builds the executable graph without persistence.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(None)
    }

    /// Builds the executable graph with a checkpointer. When `invoke(state,
    /// config)` runs with `config.thread_id` set, state is saved after every
    /// node execution so an interrupted run resumes from the last completed
    /// node.
    pub fn compile_with_checkpointer(
        self,
        checkpointer: Arc<dyn Checkpointer<S>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        self.compile_internal(Some(checkpointer))
    }

    fn compile_internal(
        self,
        checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    ) -> Result<CompiledStateGraph<S>, CompilationError> {
        let entry = self.entry.ok_or(CompilationError::MissingStart)?;
        if !self.nodes.contains_key(&entry) {
            return Err(CompilationError::NodeNotFound(entry));
        }

        let mut edges: HashMap<String, Edge<S>> = HashMap::new();
        for (from, route) in self.routes {
            if !self.nodes.contains_key(&from) {
                return Err(CompilationError::NodeNotFound(from));
            }
            if edges.contains_key(&from) {
                return Err(CompilationError::DuplicateRoute(from));
            }
            let targets = match &route {
                PendingRoute::Direct(next) => vec![next.clone()],
                PendingRoute::Conditional(router) => router.targets(),
            };
            for target in targets {
                if let Next::Node(id) = target {
                    if !self.nodes.contains_key(&id) {
                        return Err(CompilationError::NodeNotFound(id));
                    }
                }
            }
            let edge = match route {
                PendingRoute::Direct(next) => Edge::Direct(next),
                PendingRoute::Conditional(router) => Edge::Conditional(router),
            };
            edges.insert(from, edge);
        }

        for id in self.nodes.keys() {
            if !edges.contains_key(id) {
                return Err(CompilationError::MissingRoute(id.clone()));
            }
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            edges,
            entry,
            checkpointer,
            step_limit: self.step_limit,
        })
    }
}
