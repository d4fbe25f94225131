//! Conversation messages: the only channel between nodes.
//!
//! All inter-node communication goes through `SidekickState::messages`;
//! nodes append, never rewrite (except the system directive, which the
//! reducer replaces in place, see `state`).

use serde::{Deserialize, Serialize};

/// One tool invocation requested by the assistant.
///
/// `arguments` is the raw JSON string from the model; the tool node parses
/// it before calling the tool source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id assigned by the LLM; tool results echo it back.
    pub id: String,
    pub name: String,
    /// JSON-encoded arguments (may be empty for zero-arg tools).
    pub arguments: String,
}

/// Result of one executed tool call, appended as a tool-result message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the `ToolCall` this result answers.
    pub call_id: String,
    pub name: Option<String>,
    pub content: String,
}

/// A single conversation entry.
///
/// Roles mirror the usual chat set: system directive, user turn, assistant
/// turn (optionally carrying pending tool calls), and tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    System(String),
    User(String),
    Assistant {
        content: String,
        /// Pending tool calls; non-empty means the tools node must run next.
        tool_calls: Vec<ToolCall>,
    },
    Tool(ToolResult),
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User(content.into())
    }

    /// Creates an assistant message with no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Creates an assistant message carrying pending tool calls.
    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Message::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a tool-result message.
    pub fn tool(result: ToolResult) -> Self {
        Message::Tool(result)
    }

    /// Textual payload of this message, if it has one.
    ///
    /// Assistant messages with an empty content string (pure tool-call
    /// turns) return `None` so callers can fall back to a sentinel.
    pub fn text(&self) -> Option<&str> {
        match self {
            Message::System(s) | Message::User(s) => Some(s),
            Message::Assistant { content, .. } => {
                if content.is_empty() {
                    None
                } else {
                    Some(content)
                }
            }
            Message::Tool(r) => Some(&r.content),
        }
    }

    /// Pending tool calls on this message (empty unless an assistant turn
    /// requested tools).
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        match self {
            Message::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Message::System(_))
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Message::User(_))
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, Message::Tool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: text() returns payload for system/user/tool and content
    /// for assistant turns with text.
    #[test]
    fn text_returns_payload_per_role() {
        assert_eq!(Message::system("sys").text(), Some("sys"));
        assert_eq!(Message::user("hi").text(), Some("hi"));
        assert_eq!(Message::assistant("4").text(), Some("4"));
        let tool = Message::tool(ToolResult {
            call_id: "c1".into(),
            name: Some("search".into()),
            content: "result".into(),
        });
        assert_eq!(tool.text(), Some("result"));
    }

    /// **Scenario**: a pure tool-call assistant turn has no text, so the
    /// evaluator can substitute its sentinel.
    #[test]
    fn empty_assistant_content_has_no_text() {
        let m = Message::assistant_with_tools(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }],
        );
        assert_eq!(m.text(), None);
        assert_eq!(m.pending_tool_calls().len(), 1);
    }

    /// **Scenario**: pending_tool_calls is empty for every non-assistant role.
    #[test]
    fn non_assistant_roles_have_no_pending_calls() {
        assert!(Message::system("s").pending_tool_calls().is_empty());
        assert!(Message::user("u").pending_tool_calls().is_empty());
        let tool = Message::tool(ToolResult {
            call_id: "c".into(),
            name: None,
            content: "x".into(),
        });
        assert!(tool.pending_tool_calls().is_empty());
    }

    /// **Scenario**: messages round-trip through JSON unchanged (checkpoint
    /// fidelity requirement).
    #[test]
    fn message_json_roundtrip() {
        let m = Message::assistant_with_tools(
            "looking it up",
            vec![ToolCall {
                id: "c1".into(),
                name: "search".into(),
                arguments: r#"{"q":"news"}"#.into(),
            }],
        );
        let bytes = serde_json::to_vec(&m).unwrap();
        let back: Message = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(m, back);
    }
}
