//! Sidekick run state and its reducer.
//!
//! One aggregate record threaded through every node: the append-only
//! message log plus the control/data fields the routers read. Nodes return
//! [`SidekickUpdate`]s; [`SidekickState::apply`] is the reducer.
//!
//! The merge policy is field-typed: `messages` concatenates (with the
//! system-directive exception below), scalars overwrite when present in the
//! update and stay untouched when absent. Omission and explicit null are
//! different things: clearable optionals are `Option<Option<T>>` in the
//! update so a node that wants to clear a field says so explicitly.

use serde::{Deserialize, Serialize};

use crate::agent::SpecialistOutput;
use crate::error::AgentError;
use crate::graph::GraphState;
use crate::message::Message;

/// Shared state of one sidekick run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidekickState {
    /// Conversation log. Append-only within a run: the reducer only ever
    /// concatenates, except the system directive, which is replaced in
    /// place (or prepended when absent).
    pub messages: Vec<Message>,
    /// What "done" means for this assignment. Set at run start; immutable
    /// during the run (`SidekickUpdate` cannot express a change).
    pub success_criteria: String,
    /// Last evaluator feedback; overwritten each evaluation cycle.
    pub feedback_on_work: Option<String>,
    pub success_criteria_met: bool,
    pub user_input_needed: bool,
    /// Set by the worker to request the specialist; cleared by the
    /// specialist after it runs, so the router cannot re-enter it.
    pub specialist_needed: bool,
    /// Structured specialist result, for the worker to consume (e.g. hand
    /// to a storage tool).
    pub specialist_output: Option<SpecialistOutput>,
}

impl SidekickState {
    /// Fresh state for a new run: one user message and the success criteria.
    pub fn new(user_message: impl Into<String>, success_criteria: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(user_message)],
            success_criteria: success_criteria.into(),
            feedback_on_work: None,
            success_criteria_met: false,
            user_input_needed: false,
            specialist_needed: false,
            specialist_output: None,
        }
    }
}

/// Partial update returned by a node.
///
/// Every field a node does not mention is left unchanged by the reducer;
/// `Some(None)` on a clearable field is an explicit clear.
#[derive(Debug, Clone, Default)]
pub struct SidekickUpdate {
    /// Messages to merge: system entries replace-in-place/prepend, all
    /// other roles append in order.
    pub messages: Vec<Message>,
    pub feedback_on_work: Option<Option<String>>,
    pub success_criteria_met: Option<bool>,
    pub user_input_needed: Option<bool>,
    pub specialist_needed: Option<bool>,
    pub specialist_output: Option<Option<SpecialistOutput>>,
}

impl SidekickUpdate {
    /// Update that only appends messages.
    pub fn messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

impl GraphState for SidekickState {
    type Update = SidekickUpdate;

    /// Rejects structurally invalid messages before anything is merged:
    /// tool results must carry a call id, assistant tool calls an id and a
    /// name. These are programming errors in a node, not content problems.
    fn validate(update: &SidekickUpdate) -> Result<(), AgentError> {
        for message in &update.messages {
            match message {
                Message::Tool(result) if result.call_id.is_empty() => {
                    return Err(AgentError::MalformedUpdate(
                        "tool result without a call id".into(),
                    ));
                }
                Message::Assistant { tool_calls, .. } => {
                    for tc in tool_calls {
                        if tc.id.is_empty() || tc.name.is_empty() {
                            return Err(AgentError::MalformedUpdate(
                                "assistant tool call without id or name".into(),
                            ));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn apply(mut self, update: SidekickUpdate) -> Self {
        for message in update.messages {
            if message.is_system() {
                if let Some(pos) = self.messages.iter().position(Message::is_system) {
                    self.messages[pos] = message;
                } else {
                    self.messages.insert(0, message);
                }
            } else {
                self.messages.push(message);
            }
        }
        if let Some(feedback) = update.feedback_on_work {
            self.feedback_on_work = feedback;
        }
        if let Some(met) = update.success_criteria_met {
            self.success_criteria_met = met;
        }
        if let Some(needed) = update.user_input_needed {
            self.user_input_needed = needed;
        }
        if let Some(needed) = update.specialist_needed {
            self.specialist_needed = needed;
        }
        if let Some(output) = update.specialist_output {
            self.specialist_output = output;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{ToolCall, ToolResult};

    fn base() -> SidekickState {
        SidekickState::new("What's 2+2?", "numeric answer given")
    }

    /// **Scenario**: the reducer omission law: an empty update leaves the
    /// state exactly as it was.
    #[test]
    fn empty_update_is_identity() {
        let state = base();
        let merged = state.clone().apply(SidekickUpdate::default());
        assert_eq!(state, merged);
    }

    /// **Scenario**: an absent field stays put; an explicitly null field is
    /// cleared. Omission and null are not the same thing.
    #[test]
    fn omission_differs_from_explicit_null() {
        let mut state = base();
        state.feedback_on_work = Some("try harder".into());

        let untouched = state.clone().apply(SidekickUpdate::messages(vec![
            Message::assistant("still working"),
        ]));
        assert_eq!(untouched.feedback_on_work.as_deref(), Some("try harder"));

        let cleared = state.apply(SidekickUpdate {
            feedback_on_work: Some(None),
            ..Default::default()
        });
        assert_eq!(cleared.feedback_on_work, None);
    }

    /// **Scenario**: non-system messages concatenate; the log never shrinks.
    #[test]
    fn messages_concatenate_append_only() {
        let state = base();
        let before = state.messages.len();
        let merged = state.apply(SidekickUpdate::messages(vec![
            Message::assistant("working on it"),
            Message::tool(ToolResult {
                call_id: "c1".into(),
                name: Some("search".into()),
                content: "result".into(),
            }),
        ]));
        assert_eq!(merged.messages.len(), before + 2);
        assert!(merged.messages[0].is_user(), "existing entries keep order");
    }

    /// **Scenario**: a system directive replaces the existing system entry
    /// in place; with none present it is prepended.
    #[test]
    fn system_directive_replaces_or_prepends() {
        let state = base();
        let merged = state.apply(SidekickUpdate::messages(vec![Message::system("v1")]));
        assert_eq!(merged.messages[0].text(), Some("v1"));
        assert_eq!(merged.messages.len(), 2, "prepended, not appended");

        let merged = merged.apply(SidekickUpdate::messages(vec![
            Message::system("v2"),
            Message::assistant("reply"),
        ]));
        assert_eq!(merged.messages[0].text(), Some("v2"));
        assert_eq!(merged.messages.len(), 3, "replaced in place");
        let systems = merged.messages.iter().filter(|m| m.is_system()).count();
        assert_eq!(systems, 1);
    }

    /// **Scenario**: scalar flags overwrite only when present in the update.
    #[test]
    fn scalar_flags_last_write_wins() {
        let state = base().apply(SidekickUpdate {
            success_criteria_met: Some(true),
            specialist_needed: Some(true),
            ..Default::default()
        });
        assert!(state.success_criteria_met);
        assert!(state.specialist_needed);
        assert!(!state.user_input_needed, "unmentioned flag untouched");

        let state = state.apply(SidekickUpdate {
            specialist_needed: Some(false),
            ..Default::default()
        });
        assert!(!state.specialist_needed);
        assert!(state.success_criteria_met, "unmentioned flag untouched");
    }

    /// **Scenario**: validate rejects a tool result without a call id and
    /// an assistant tool call without a name.
    #[test]
    fn validate_rejects_malformed_messages() {
        let update = SidekickUpdate::messages(vec![Message::tool(ToolResult {
            call_id: String::new(),
            name: None,
            content: "orphan".into(),
        })]);
        assert!(matches!(
            SidekickState::validate(&update),
            Err(AgentError::MalformedUpdate(_))
        ));

        let update = SidekickUpdate::messages(vec![Message::assistant_with_tools(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: String::new(),
                arguments: "{}".into(),
            }],
        )]);
        assert!(matches!(
            SidekickState::validate(&update),
            Err(AgentError::MalformedUpdate(_))
        ));
    }

    /// **Scenario**: the full state round-trips through JSON, checkpoint
    /// fidelity for every field.
    #[test]
    fn state_json_roundtrip() {
        use crate::agent::{Article, LanguageItem, LanguageItemKind, SpecialistOutput};

        let mut state = base();
        state.feedback_on_work = Some("needs sources".into());
        state.specialist_needed = true;
        state.specialist_output = Some(SpecialistOutput {
            articles: vec![Article {
                korean_text: "뉴스".into(),
                english_translation: "news".into(),
                language_items: vec![LanguageItem {
                    kind: LanguageItemKind::Grammar,
                    korean: "-아요".into(),
                    english: "polite ending".into(),
                    context: None,
                }],
                date: Some("2025-11-02".into()),
                link: None,
                title: None,
                source: None,
                topic: None,
            }],
        });

        let bytes = serde_json::to_vec(&state).unwrap();
        let back: SidekickState = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(state, back);
    }
}
