//! Multi-agent task execution on a typed state graph.
//!
//! A worker agent drives a task with tools, a specialist transforms domain
//! content into structured output, and an evaluator gates completion against
//! per-run success criteria. The three run as nodes of a [`graph::StateGraph`]
//! over one shared [`state::SidekickState`]; nodes return partial updates
//! that a reducer merges, and every completed node is checkpointed so a
//! thread survives interruption and restarts.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sidekick::agent::{
//!     HandleToolErrors, KoreanLearningTrigger, SidekickCapabilities, SidekickRunner,
//! };
//! use sidekick::llm::{MockLlm, MockStructured};
//! use sidekick::memory::MemorySaver;
//! use sidekick::tool_source::MockToolSource;
//!
//! # async fn demo() -> Result<(), sidekick::agent::RunError> {
//! let capabilities = SidekickCapabilities {
//!     worker_llm: Box::new(MockLlm::fixed("done")),
//!     specialist: Box::new(MockStructured::new()),
//!     evaluator: Box::new(MockStructured::new()),
//!     tool_source: Arc::new(MockToolSource::default()),
//!     trigger: Arc::new(KoreanLearningTrigger),
//! };
//! let runner = SidekickRunner::new(
//!     capabilities,
//!     Arc::new(MemorySaver::new()),
//!     HandleToolErrors::default(),
//! )
//! .await?;
//! let reply = runner.run("thread-1", "What's 2+2?", "numeric answer").await?;
//! println!("{}", reply.reply);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod state;
pub mod tool_source;

pub use agent::{SidekickReply, SidekickRunner};
pub use error::AgentError;
pub use graph::{CompiledStateGraph, GraphState, Next, Node, Router, StateGraph, END, START};
pub use message::{Message, ToolCall, ToolResult};
pub use state::{SidekickState, SidekickUpdate};
