//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Drives the
//! step loop: run node, validate and merge its update, checkpoint, evaluate
//! the node's route, repeat until a router returns `Next::End`.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AgentError;
use crate::graph::graph_state::GraphState;
use crate::graph::node::Node;
use crate::graph::router::{Next, Router};
use crate::memory::{Checkpoint, CheckpointSource, Checkpointer, RunnableConfig};

/// Outgoing route of a node: fixed destination or conditional router.
pub(super) enum Edge<S: GraphState> {
    Direct(Next),
    Conditional(Arc<dyn Router<S>>),
}

/// Compiled graph: immutable structure, supports invoke only.
///
/// Owns the node registry and the edge/router table. With a checkpointer and
/// a `config.thread_id`, state is saved after **every** node execution, not
/// only at the end, so an interrupted run can resume from the last completed
/// node.
pub struct CompiledStateGraph<S: GraphState> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) edges: HashMap<String, Edge<S>>,
    pub(super) entry: String,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    pub(super) step_limit: Option<usize>,
}

impl<S: GraphState> std::fmt::Debug for CompiledStateGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledStateGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .field("entry", &self.entry)
            .field("step_limit", &self.step_limit)
            .finish_non_exhaustive()
    }
}

impl<S: GraphState> CompiledStateGraph<S> {
    /// Runs the graph to completion, starting at the entry node.
    ///
    /// Per step: run the node, validate its update (`MalformedUpdate` fails
    /// the run with nothing merged), merge through the reducer, checkpoint,
    /// then follow the node's edge or router. A checkpoint write failure is
    /// a capability failure and propagates like any other.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        let mut state = state;
        let mut current = self.entry.clone();
        let mut step: u64 = 0;
        info!(entry = %current, "starting graph run");

        loop {
            if let Some(limit) = self.step_limit {
                if step as usize >= limit {
                    return Err(AgentError::StepLimit(limit));
                }
            }

            let node = self
                .nodes
                .get(&current)
                .expect("compiled graph has all nodes");
            debug!(node = %current, step, "running node");
            let update = node.run(&state).await?;
            S::validate(&update)?;
            state = state.apply(update);
            step += 1;
            self.save_checkpoint(&state, &config, step).await?;

            let next = match self
                .edges
                .get(&current)
                .expect("compiled graph has all routes")
            {
                Edge::Direct(next) => next.clone(),
                Edge::Conditional(router) => router.route(&state),
            };
            debug!(node = %current, next = ?next, "node complete");

            match next {
                Next::End => {
                    info!(steps = step, "graph run complete");
                    return Ok(state);
                }
                Next::Node(id) => current = id,
            }
        }
    }

    async fn save_checkpoint(
        &self,
        state: &S,
        config: &Option<RunnableConfig>,
        step: u64,
    ) -> Result<(), AgentError> {
        if let (Some(cp), Some(cfg)) = (&self.checkpointer, config) {
            if cfg.thread_id.is_some() {
                let checkpoint = Checkpoint::from_state(state.clone(), CheckpointSource::Loop, step);
                cp.put(cfg, &checkpoint)
                    .await
                    .map_err(|e| AgentError::Capability(e.to_string()))?;
            }
        }
        Ok(())
    }
}
