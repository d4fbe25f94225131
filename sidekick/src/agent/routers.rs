//! Routers wiring the worker, specialist, tools, and evaluator nodes.
//!
//! Both routers are pure functions of the state. Specialist and tools hops
//! are not routed here; they return to the worker on direct edges.

use crate::graph::{Next, Router};
use crate::state::SidekickState;

pub const WORKER: &str = "worker";
pub const SPECIALIST: &str = "specialist";
pub const TOOLS: &str = "tools";
pub const EVALUATOR: &str = "evaluator";

/// After the worker: specialist when delegation is flagged, tools when the
/// latest message carries pending tool calls, otherwise the evaluator.
/// Specialist wins over tools when both would apply.
#[derive(Debug, Default)]
pub struct WorkerRouter;

impl Router<SidekickState> for WorkerRouter {
    fn route(&self, state: &SidekickState) -> Next {
        if state.specialist_needed {
            return Next::node(SPECIALIST);
        }
        let pending = state
            .messages
            .last()
            .map(|m| !m.pending_tool_calls().is_empty())
            .unwrap_or(false);
        if pending {
            Next::node(TOOLS)
        } else {
            Next::node(EVALUATOR)
        }
    }

    fn targets(&self) -> Vec<Next> {
        vec![
            Next::node(SPECIALIST),
            Next::node(TOOLS),
            Next::node(EVALUATOR),
        ]
    }
}

/// After the evaluator: end when the criteria are met or the user must
/// weigh in, otherwise hand the feedback back to the worker.
#[derive(Debug, Default)]
pub struct EvaluatorRouter;

impl Router<SidekickState> for EvaluatorRouter {
    fn route(&self, state: &SidekickState) -> Next {
        if state.success_criteria_met || state.user_input_needed {
            Next::End
        } else {
            Next::node(WORKER)
        }
    }

    fn targets(&self) -> Vec<Next> {
        vec![Next::node(WORKER), Next::End]
    }
}
