//! LLM capability traits.
//!
//! The engine never talks to a model directly; nodes hold one of these
//! traits. `LlmClient` is the free-text + tool-call capability the worker
//! uses; `StructuredClient<T>` is the schema-validated variant the
//! specialist and evaluator use. Real bindings (OpenAI-compatible APIs etc.)
//! implement these outside this crate; `MockLlm` / `MockStructured` cover
//! tests and examples.

mod mock;

pub use mock::{MockLlm, MockStructured};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::{Message, ToolCall};
use crate::tool_source::ToolSpec;

/// Response from an LLM completion: assistant text and optional tool calls.
///
/// **Interaction**: returned by `LlmClient::invoke`; the worker node turns
/// it into one assistant message (with pending tool calls when non-empty).
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Assistant message content (plain text; may be empty on a pure
    /// tool-call turn).
    pub content: String,
    /// Tool calls requested this turn; empty means the model is done with
    /// tools.
    pub tool_calls: Vec<ToolCall>,
}

impl LlmResponse {
    /// A text-only response with no tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A response requesting tool calls.
    pub fn with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }
}

/// LLM client bound to a tool set: given the conversation and the declared
/// tools, returns assistant text and any tool invocations.
///
/// Failures are capability failures; they propagate to the run caller and
/// are never retried by the engine.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError>;
}

/// Structured-output LLM capability: returns a schema-validated record
/// instead of free text. The caller declares the record type; how the
/// implementation enforces the schema is its own business.
#[async_trait]
pub trait StructuredClient<T>: Send + Sync
where
    T: Send + 'static,
{
    async fn invoke(&self, messages: &[Message]) -> Result<T, AgentError>;
}
