//! Tool execution capability.
//!
//! The worker declares the tool set to the LLM; the tool node executes the
//! calls the LLM requests. Everything behind `ToolSource` is an external
//! collaborator (a browser, a search API, a database) and this crate only
//! ships a mock. Real sources implement the trait.

mod mock;

pub use mock::{FailingToolSource, MockToolSource};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Declared tool: name, description, JSON Schema of the arguments.
///
/// **Interaction**: listed by `ToolSource::list_tools`; passed to
/// `LlmClient::invoke` as the tool binding set.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Value,
}

/// Text content returned by one tool call.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    pub text: String,
}

/// Error from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    /// No tool with that name.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The tool ran and failed.
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// A set of callable tools.
///
/// **Interaction**: `list_tools` feeds the worker's tool bindings;
/// `call_tool` is invoked by the tool node once per pending call, in call
/// order.
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;
}
