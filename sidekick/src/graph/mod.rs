//! State graph engine: nodes, routers, compile and invoke.
//!
//! Nodes read the shared state and return partial updates; a reducer on the
//! state type merges them. Routing is a separate pure function evaluated
//! after each node, so conditional edges never hide inside node bodies.

mod compile_error;
mod compiled;
mod graph_state;
mod node;
mod router;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use graph_state::GraphState;
pub use node::Node;
pub use router::{Next, Router};
pub use state_graph::{StateGraph, END, START};
