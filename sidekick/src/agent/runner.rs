//! Sidekick runner: wires the agent graph and drives multi-turn sessions.
//!
//! One runner owns one compiled graph plus the checkpointer. `run` is one
//! user turn: load the thread's latest checkpoint (or start fresh), append
//! the user message, reset the per-turn verdict fields, and invoke the
//! graph to completion.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::agent::evaluator::EvaluatorNode;
use crate::agent::output::{EvaluatorVerdict, SpecialistOutput};
use crate::agent::routers::{EvaluatorRouter, WorkerRouter, EVALUATOR, SPECIALIST, TOOLS, WORKER};
use crate::agent::specialist::SpecialistNode;
use crate::agent::tools::{HandleToolErrors, ToolNode};
use crate::agent::trigger::DelegationTrigger;
use crate::agent::worker::WorkerNode;
use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, GraphState, StateGraph, START};
use crate::llm::{LlmClient, StructuredClient};
use crate::memory::{Checkpointer, CheckpointError, RunnableConfig};
use crate::state::{SidekickState, SidekickUpdate};
use crate::tool_source::{ToolSource, ToolSourceError};

/// Criteria used when the caller provides none.
const DEFAULT_CRITERIA: &str = "The answer should be clear and accurate";

/// Anything that can fail around a run, beyond node execution itself.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("graph compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("execution error: {0}")]
    Execution(#[from] AgentError),
    #[error("tool source error: {0}")]
    ToolSource(#[from] ToolSourceError),
    #[error("run produced no assistant response")]
    EmptyRun,
}

/// Capabilities the runner needs to assemble the graph.
pub struct SidekickCapabilities {
    pub worker_llm: Box<dyn LlmClient>,
    pub specialist: Box<dyn StructuredClient<SpecialistOutput>>,
    pub evaluator: Box<dyn StructuredClient<EvaluatorVerdict>>,
    pub tool_source: Arc<dyn ToolSource>,
    pub trigger: Arc<dyn DelegationTrigger>,
}

/// Final answer of one user turn plus the evaluator's feedback on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidekickReply {
    pub reply: String,
    pub feedback: String,
}

/// Assembled agent: compiled graph plus the checkpointer for resumption.
pub struct SidekickRunner {
    graph: CompiledStateGraph<SidekickState>,
    checkpointer: Arc<dyn Checkpointer<SidekickState>>,
}

impl SidekickRunner {
    /// Builds the full graph: worker at the entry, conditional routes after
    /// worker and evaluator, direct returns from specialist and tools. The
    /// tool list is fetched once here and bound to the worker.
    pub async fn new(
        capabilities: SidekickCapabilities,
        checkpointer: Arc<dyn Checkpointer<SidekickState>>,
        on_tool_error: HandleToolErrors,
    ) -> Result<Self, RunError> {
        let tools = capabilities.tool_source.list_tools().await?;
        info!(tools = tools.len(), "assembling sidekick graph");

        let worker = WorkerNode::new(
            capabilities.worker_llm,
            tools,
            capabilities.trigger.clone(),
        );
        let specialist = SpecialistNode::new(capabilities.specialist, capabilities.trigger);
        let tool_node =
            ToolNode::new(capabilities.tool_source).with_error_handling(on_tool_error);
        let evaluator = EvaluatorNode::new(capabilities.evaluator);

        let mut graph = StateGraph::<SidekickState>::new();
        graph
            .add_node(WORKER, Arc::new(worker))
            .add_node(SPECIALIST, Arc::new(specialist))
            .add_node(TOOLS, Arc::new(tool_node))
            .add_node(EVALUATOR, Arc::new(evaluator))
            .add_edge(START, WORKER)
            .add_conditional_edges(WORKER, Arc::new(WorkerRouter))
            .add_edge(SPECIALIST, WORKER)
            .add_edge(TOOLS, WORKER)
            .add_conditional_edges(EVALUATOR, Arc::new(EvaluatorRouter));
        let graph = graph.compile_with_checkpointer(checkpointer.clone())?;

        Ok(Self {
            graph,
            checkpointer,
        })
    }

    /// Runs one user turn on a thread.
    ///
    /// Prior state is restored from the thread's latest checkpoint, so the
    /// conversation survives process restarts. Verdict fields from the
    /// previous turn are reset; the message log is kept.
    pub async fn run(
        &self,
        thread_id: impl Into<String>,
        user_message: impl Into<String>,
        success_criteria: impl Into<String>,
    ) -> Result<SidekickReply, RunError> {
        let config = RunnableConfig::for_thread(thread_id);
        let criteria = {
            let given = success_criteria.into();
            if given.trim().is_empty() {
                DEFAULT_CRITERIA.to_string()
            } else {
                given
            }
        };

        let state = match self.checkpointer.get_tuple(&config).await? {
            Some((checkpoint, _)) => {
                Self::next_turn(checkpoint.state, user_message.into(), criteria)
            }
            None => SidekickState::new(user_message, criteria),
        };

        let state = self.graph.invoke(state, Some(config)).await?;
        Self::reply_from(&state).ok_or(RunError::EmptyRun)
    }

    /// Restored state, prepared for a new turn: user message appended,
    /// criteria replaced, verdict and delegation fields cleared.
    /// `user_input_needed` is carried forward: when the previous turn ended
    /// on a clarifying question, the worker must treat this message as the
    /// user's clarification.
    fn next_turn(
        mut state: SidekickState,
        user_message: String,
        criteria: String,
    ) -> SidekickState {
        state.success_criteria = criteria;
        state.apply(SidekickUpdate {
            messages: vec![crate::message::Message::user(user_message)],
            feedback_on_work: Some(None),
            success_criteria_met: Some(false),
            specialist_needed: Some(false),
            specialist_output: Some(None),
            ..Default::default()
        })
    }

    /// The worker's final answer is the second-to-last message; the
    /// evaluator's feedback message is the last.
    fn reply_from(state: &SidekickState) -> Option<SidekickReply> {
        let n = state.messages.len();
        if n < 2 {
            return None;
        }
        let feedback = state.messages[n - 1].text()?.to_string();
        let reply = state.messages[n - 2].text()?.to_string();
        Some(SidekickReply { reply, feedback })
    }
}
