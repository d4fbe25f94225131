//! Tool node: executes the pending tool calls of the latest assistant turn.
//!
//! Calls run in request order against the [`ToolSource`]; each produces one
//! tool-result message echoing the call id. Argument strings that are empty
//! or unparsable degrade to an empty JSON object rather than failing the
//! run.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::AgentError;
use crate::graph::Node;
use crate::message::{Message, ToolResult};
use crate::state::{SidekickState, SidekickUpdate};
use crate::tool_source::ToolSource;

/// What to do when a tool call fails.
#[derive(Debug, Clone, Default)]
pub enum HandleToolErrors {
    /// Fail the run: the error propagates as `AgentError::Capability`.
    #[default]
    Never,
    /// Convert the failure into a tool-result message so the worker can see
    /// it and react. `Some(text)` overrides the error text.
    Always(Option<String>),
}

/// Tool node: pending calls in, tool results out.
pub struct ToolNode {
    source: Arc<dyn ToolSource>,
    on_error: HandleToolErrors,
}

impl ToolNode {
    pub fn new(source: Arc<dyn ToolSource>) -> Self {
        Self {
            source,
            on_error: HandleToolErrors::default(),
        }
    }

    pub fn with_error_handling(mut self, on_error: HandleToolErrors) -> Self {
        self.on_error = on_error;
        self
    }

    fn parse_arguments(raw: &str) -> Value {
        if raw.trim().is_empty() {
            return json!({});
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            warn!(error = %e, "tool arguments are not valid JSON, using empty object");
            json!({})
        })
    }
}

fn truncate_for_log(text: &str) -> &str {
    match text.char_indices().nth(120) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl Node<SidekickState> for ToolNode {
    fn id(&self) -> &str {
        "tools"
    }

    async fn run(&self, state: &SidekickState) -> Result<SidekickUpdate, AgentError> {
        let calls = state
            .messages
            .last()
            .map(Message::pending_tool_calls)
            .unwrap_or(&[]);

        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let arguments = Self::parse_arguments(&call.arguments);
            debug!(tool = %call.name, call_id = %call.id, "executing tool call");
            let content = match self.source.call_tool(&call.name, arguments).await {
                Ok(content) => content.text,
                Err(e) => match &self.on_error {
                    HandleToolErrors::Never => {
                        return Err(AgentError::Capability(e.to_string()));
                    }
                    HandleToolErrors::Always(override_text) => {
                        warn!(tool = %call.name, error = %e, "tool call failed, reporting to worker");
                        override_text.clone().unwrap_or_else(|| e.to_string())
                    }
                },
            };
            debug!(tool = %call.name, result = %truncate_for_log(&content), "tool call complete");
            results.push(Message::tool(ToolResult {
                call_id: call.id.clone(),
                name: Some(call.name.clone()),
                content,
            }));
        }

        Ok(SidekickUpdate::messages(results))
    }
}
