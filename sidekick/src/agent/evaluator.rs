//! Evaluator node: judges the worker's latest answer against the success
//! criteria.
//!
//! Builds a plain-text transcript of the user/assistant turns, asks a
//! schema-bound LLM for an [`EvaluatorVerdict`], and merges feedback plus
//! the two routing flags in one update.

use async_trait::async_trait;
use tracing::info;

use crate::agent::output::EvaluatorVerdict;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::StructuredClient;
use crate::message::Message;
use crate::state::{SidekickState, SidekickUpdate};

/// Stands in for the judged answer when the last assistant turn has no
/// textual content (e.g. it was a pure tool call).
const NO_TEXT_SENTINEL: &str = "[No text content - tool calls or empty message]";

const EVALUATOR_DIRECTIVE: &str = "\
You are an evaluator that determines if a task has been completed \
successfully by an assistant. Assess the assistant's last response based on \
the given criteria. Respond with your feedback, and with your decision on \
whether the success criteria have been met, and whether more input is needed \
from the user.";

/// Evaluator node: verdict in, feedback and routing flags out.
pub struct EvaluatorNode {
    client: Box<dyn StructuredClient<EvaluatorVerdict>>,
}

impl EvaluatorNode {
    pub fn new(client: Box<dyn StructuredClient<EvaluatorVerdict>>) -> Self {
        Self { client }
    }

    fn transcript(state: &SidekickState) -> String {
        let mut out = String::from("Conversation history:\n\n");
        for message in &state.messages {
            match message {
                Message::User(content) => {
                    out.push_str(&format!("User: {content}\n"));
                }
                Message::Assistant { .. } => {
                    let text = message.text().unwrap_or("[Tools use]");
                    out.push_str(&format!("Assistant: {text}\n"));
                }
                // System directives and raw tool output are not part of the
                // judged conversation.
                Message::System(_) | Message::Tool(_) => {}
            }
        }
        out
    }

    fn assessment_request(state: &SidekickState) -> String {
        let last_answer = state
            .messages
            .iter()
            .rev()
            .find(|m| matches!(m, Message::Assistant { .. }))
            .and_then(Message::text)
            .unwrap_or(NO_TEXT_SENTINEL);

        let mut request = format!(
            "{transcript}\nThe success criteria for this assignment is:\n\
             {criteria}\n\nAnd the final response from the assistant that \
             you are evaluating is:\n{last_answer}\n\nRespond with your \
             feedback, and decide if the success criteria is met by this \
             response.\nAlso, decide if more user input is required, either \
             because the assistant has a question, needs clarification, or \
             seems to be stuck and unable to answer without help.\n",
            transcript = Self::transcript(state),
            criteria = state.success_criteria,
            last_answer = last_answer,
        );

        if let Some(previous) = &state.feedback_on_work {
            request.push_str(&format!(
                "\nAlso, note that in a prior attempt from the assistant, you \
                 provided this feedback:\n{previous}\nIf you're seeing the \
                 assistant repeating the same mistakes, then consider \
                 responding that user input is required.\n",
            ));
        }

        request
    }
}

#[async_trait]
impl Node<SidekickState> for EvaluatorNode {
    fn id(&self) -> &str {
        "evaluator"
    }

    async fn run(&self, state: &SidekickState) -> Result<SidekickUpdate, AgentError> {
        let conversation = vec![
            Message::system(EVALUATOR_DIRECTIVE),
            Message::user(Self::assessment_request(state)),
        ];
        let verdict = self.client.invoke(&conversation).await?;
        info!(
            met = verdict.success_criteria_met,
            user_input_needed = verdict.user_input_needed,
            "evaluator verdict"
        );

        Ok(SidekickUpdate {
            messages: vec![Message::assistant(format!(
                "Evaluator feedback on this answer: {}",
                verdict.feedback
            ))],
            feedback_on_work: Some(Some(verdict.feedback)),
            success_criteria_met: Some(verdict.success_criteria_met),
            user_input_needed: Some(verdict.user_input_needed),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphState;
    use crate::llm::MockStructured;
    use crate::message::ToolCall;

    fn verdict(feedback: &str, met: bool, input: bool) -> EvaluatorVerdict {
        EvaluatorVerdict {
            feedback: feedback.into(),
            success_criteria_met: met,
            user_input_needed: input,
        }
    }

    /// **Scenario**: the verdict lands in one atomic update: feedback
    /// message, feedback field, and both flags together.
    #[tokio::test]
    async fn verdict_merges_atomically() {
        let node = EvaluatorNode::new(Box::new(MockStructured::fixed(verdict(
            "well done", true, false,
        ))));
        let mut state = SidekickState::new("What's 2+2?", "numeric answer given");
        state.messages.push(Message::assistant("4"));

        let update = node.run(&state).await.unwrap();
        assert_eq!(
            update.messages[0].text(),
            Some("Evaluator feedback on this answer: well done")
        );
        assert_eq!(update.feedback_on_work, Some(Some("well done".into())));
        assert_eq!(update.success_criteria_met, Some(true));
        assert_eq!(update.user_input_needed, Some(false));

        let merged = state.apply(update);
        assert!(merged.success_criteria_met);
        assert_eq!(merged.feedback_on_work.as_deref(), Some("well done"));
    }

    /// **Scenario**: the transcript keeps user and assistant turns, renders
    /// "[Tools use]" for any textless assistant turn, and skips system and
    /// tool messages. An assistant turn that has text shows the text even
    /// when it also carries tool calls.
    #[test]
    fn transcript_covers_conversation_turns() {
        let mut state = SidekickState::new("Find a Korean article", "summary given");
        state.messages.insert(0, Message::system("directive"));
        state.messages.push(Message::assistant_with_tools(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }],
        ));
        state.messages.push(Message::tool(crate::message::ToolResult {
            call_id: "c1".into(),
            name: Some("search".into()),
            content: "raw tool output".into(),
        }));
        state.messages.push(Message::assistant_with_tools(
            "Searching deeper.",
            vec![ToolCall {
                id: "c2".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }],
        ));
        state.messages.push(Message::assistant(""));
        state.messages.push(Message::assistant("Here is the summary."));

        let transcript = EvaluatorNode::transcript(&state);
        assert!(transcript.starts_with("Conversation history:\n\n"));
        assert!(transcript.contains("User: Find a Korean article"));
        assert!(transcript.contains("Assistant: Searching deeper."));
        assert!(transcript.contains("Assistant: Here is the summary."));
        assert!(!transcript.contains("directive"));
        assert!(!transcript.contains("raw tool output"));
        let tools_use = transcript.matches("Assistant: [Tools use]").count();
        assert_eq!(tools_use, 2, "both textless assistant turns");
    }

    /// **Scenario**: prior feedback is quoted in the assessment request so
    /// the evaluator can spot repeated mistakes.
    #[test]
    fn prior_feedback_quoted_in_request() {
        let mut state = SidekickState::new("task", "done");
        state.messages.push(Message::assistant("attempt two"));
        state.feedback_on_work = Some("cite your sources".into());
        let request = EvaluatorNode::assessment_request(&state);
        assert!(request.contains("cite your sources"));
        assert!(request.contains("prior attempt"));
    }

    /// **Scenario**: a textless final assistant turn is judged via the
    /// sentinel instead of an empty string.
    #[test]
    fn textless_answer_uses_sentinel() {
        let mut state = SidekickState::new("task", "done");
        state.messages.push(Message::assistant(""));
        let request = EvaluatorNode::assessment_request(&state);
        assert!(request.contains(NO_TEXT_SENTINEL));
    }
}
