//! Specialist node: structured transformation of domain content.
//!
//! Invoked only via the worker's delegation flag. Picks the most recent
//! user or assistant text carrying domain content, sends it through a
//! schema-bound LLM call, and merges the result back as structured output
//! plus a transcript summary.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::agent::output::SpecialistOutput;
use crate::agent::trigger::DelegationTrigger;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::StructuredClient;
use crate::message::Message;
use crate::state::{SidekickState, SidekickUpdate};

const SPECIALIST_DIRECTIVE: &str = "\
You are a Korean language learning specialist. You take Korean articles and \
transform them for learners:
1. Simplify the Korean text to A2 level, keeping the original meaning.
2. Translate the simplified text to English.
3. Extract language items: vocabulary, grammar points, and sentence patterns, \
each with its Korean form, English explanation, and a usage context.
Process every article in the provided content.";

/// Specialist node: domain content in, [`SpecialistOutput`] out.
///
/// Lowers `specialist_needed` in its own update, which is what guarantees
/// single entry per delegation: the router sees the flag down again on the
/// very next worker hop.
pub struct SpecialistNode {
    client: Box<dyn StructuredClient<SpecialistOutput>>,
    trigger: Arc<dyn DelegationTrigger>,
}

impl SpecialistNode {
    pub fn new(
        client: Box<dyn StructuredClient<SpecialistOutput>>,
        trigger: Arc<dyn DelegationTrigger>,
    ) -> Self {
        Self { client, trigger }
    }

    /// Most recent user or assistant text carrying domain content, scanning
    /// the history in reverse. Raw tool output and system directives are not
    /// scanned; when nothing matches, the fallback is the last message with
    /// any text at all, whatever its role.
    fn source_content<'a>(&self, state: &'a SidekickState) -> Option<&'a str> {
        for message in state.messages.iter().rev() {
            if !message.is_user() && !matches!(message, Message::Assistant { .. }) {
                continue;
            }
            if let Some(text) = message.text() {
                if self.trigger.has_domain_content(text) {
                    return Some(text);
                }
            }
        }
        state.messages.iter().rev().find_map(Message::text)
    }
}

#[async_trait]
impl Node<SidekickState> for SpecialistNode {
    fn id(&self) -> &str {
        "specialist"
    }

    async fn run(&self, state: &SidekickState) -> Result<SidekickUpdate, AgentError> {
        let content = self.source_content(state).unwrap_or_default();
        let conversation = vec![
            Message::system(SPECIALIST_DIRECTIVE),
            Message::user(format!(
                "Transform the following content for language learners:\n\n{content}"
            )),
        ];

        let output = self.client.invoke(&conversation).await?;
        info!(articles = output.articles.len(), "specialist processed content");

        Ok(SidekickUpdate {
            messages: vec![Message::assistant(output.summary())],
            specialist_needed: Some(false),
            specialist_output: Some(Some(output)),
            ..Default::default()
        })
    }
}
