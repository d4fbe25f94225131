//! Worker node: the agent that actually does the task.
//!
//! Reads the whole state, assembles the system directive (success criteria,
//! specialist output availability, evaluator feedback, clarification
//! policy), and delegates to an LLM bound to the tool set. Appends exactly
//! one assistant message per run; conditionally raises `specialist_needed`.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::agent::trigger::DelegationTrigger;
use crate::error::AgentError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::{SidekickState, SidekickUpdate};
use crate::tool_source::ToolSpec;

/// Worker node: one task step per run.
///
/// **Interaction**: implements `Node<SidekickState>`; holds the `LlmClient`
/// and the declared tool set; consults the `DelegationTrigger` for the
/// specialist gates. The directive is rebuilt from state on every run and
/// embedded into the LLM conversation locally; the update carries only the
/// produced assistant message.
pub struct WorkerNode {
    llm: Box<dyn LlmClient>,
    tools: Vec<ToolSpec>,
    trigger: Arc<dyn DelegationTrigger>,
}

impl WorkerNode {
    pub fn new(
        llm: Box<dyn LlmClient>,
        tools: Vec<ToolSpec>,
        trigger: Arc<dyn DelegationTrigger>,
    ) -> Self {
        Self {
            llm,
            tools,
            trigger,
        }
    }

    fn directive(&self, state: &SidekickState, is_domain_request: bool) -> String {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut directive = format!(
            "You are a helpful assistant that can use tools to complete tasks.\n\
             You keep working on a task until either you have a question or \
             clarification for the user, or the success criteria is met.\n\
             You have many tools to help you, including tools to browse the \
             internet, navigating and retrieving web pages.\n\
             You also have a specialist agent that can transform domain \
             articles into a simpler, more understandable format for learners. \
             When the specialist has processed articles, the structured output \
             will be available to you and a summary will appear in the \
             conversation; when storing results, store exactly that structured \
             output.\n\
             The current date and time is {now}\n\n\
             This is the success criteria:\n{criteria}\n\
             You should reply either with a question for the user about this \
             assignment, or with your final response.\n",
            now = now,
            criteria = state.success_criteria,
        );

        if is_domain_request {
            if let Some(supplement) = self.trigger.directive_supplement() {
                directive.push('\n');
                directive.push_str(supplement);
            }
        }

        if let Some(output) = &state.specialist_output {
            directive.push_str(&format!(
                "\nThe specialist has already processed the content. This is \
                 its output; store or present exactly this, do not re-process:\n{}",
                output.summary()
            ));
        }

        if state.user_input_needed {
            directive.push_str(
                "\nPreviously, you asked clarifying questions to the user about \
                 the request. The user has now replied with clarifications. If \
                 the clarifications are adequate, you can then start to perform \
                 the task with these clarifications. Otherwise you should ask \
                 further questions - be very specific.\n",
            );
        } else {
            directive.push_str(
                "\nDO NOT perform the task or provide any answer if the request \
                 is ambiguous. Ask clarifying questions to the user unless the \
                 request is crystal clear. If you've finished, reply with the \
                 final answer, and don't ask a question; simply reply with the \
                 answer.\n",
            );
        }

        if let Some(feedback) = &state.feedback_on_work {
            directive.push_str(&format!(
                "\nPreviously you thought you completed the assignment, but your \
                 reply was rejected because the success criteria was not met. \
                 Here is the feedback on why this was rejected:\n{feedback}\n\
                 With this feedback, please continue the assignment, ensuring \
                 that you meet the success criteria or have a question for the \
                 user.\n",
            ));
        }

        directive
    }

    /// The four delegation gates: domain content present in an executed tool
    /// result or in the produced response, tools have actually executed, the
    /// specialist has not already produced output, and the response carries
    /// no pending tool calls. All must hold, and only for domain requests;
    /// this is what keeps one content batch from being delegated twice.
    fn should_delegate(
        &self,
        state: &SidekickState,
        response_content: &str,
        has_pending_calls: bool,
    ) -> bool {
        let tools_have_executed = state.messages.iter().any(Message::is_tool_result);
        if !tools_have_executed {
            return false;
        }
        let in_tool_results = state
            .messages
            .iter()
            .filter(|m| m.is_tool_result())
            .filter_map(Message::text)
            .any(|text| self.trigger.has_domain_content(text));
        let in_response = self.trigger.has_domain_content(response_content);

        (in_tool_results || in_response)
            && state.specialist_output.is_none()
            && !has_pending_calls
    }
}

#[async_trait]
impl Node<SidekickState> for WorkerNode {
    fn id(&self) -> &str {
        "worker"
    }

    async fn run(&self, state: &SidekickState) -> Result<SidekickUpdate, AgentError> {
        let is_domain_request = self.trigger.is_domain_request(state);
        let directive = self.directive(state, is_domain_request);

        // The directive is per-invocation context, not conversation history:
        // it is embedded here (replacing any system entry a caller seeded)
        // and never merged into state.
        let mut conversation = state.messages.clone();
        match conversation.iter().position(Message::is_system) {
            Some(pos) => conversation[pos] = Message::system(directive),
            None => conversation.insert(0, Message::system(directive)),
        }

        let response = self.llm.invoke(&conversation, &self.tools).await?;
        let has_pending_calls = !response.tool_calls.is_empty();
        debug!(
            pending_calls = response.tool_calls.len(),
            domain_request = is_domain_request,
            "worker produced a response"
        );

        let delegate = is_domain_request
            && self.should_delegate(state, &response.content, has_pending_calls);
        let produced = Message::assistant_with_tools(response.content, response.tool_calls);

        Ok(SidekickUpdate {
            messages: vec![produced],
            specialist_needed: if delegate { Some(true) } else { None },
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::trigger::KoreanLearningTrigger;
    use crate::agent::{Article, SpecialistOutput};
    use crate::graph::GraphState;
    use crate::llm::{LlmResponse, MockLlm};
    use crate::message::{ToolCall, ToolResult};

    fn worker(llm: MockLlm) -> WorkerNode {
        WorkerNode::new(Box::new(llm), Vec::new(), Arc::new(KoreanLearningTrigger))
    }

    fn korean_state_with_tool_result() -> SidekickState {
        let mut state = SidekickState::new("Find a Korean news article", "article simplified");
        state.messages.push(Message::assistant_with_tools(
            "",
            vec![ToolCall {
                id: "c1".into(),
                name: "search".into(),
                arguments: "{}".into(),
            }],
        ));
        state.messages.push(Message::tool(ToolResult {
            call_id: "c1".into(),
            name: Some("search".into()),
            content: "오늘 서울의 날씨는 맑습니다.".into(),
        }));
        state
    }

    /// **Scenario**: worker appends exactly one produced message and nothing
    /// else; the directive never enters the log.
    #[tokio::test]
    async fn appends_exactly_one_message() {
        let node = worker(MockLlm::fixed("4"));
        let state = SidekickState::new("What's 2+2?", "numeric answer given");
        let update = node.run(&state).await.unwrap();
        assert_eq!(update.messages.len(), 1);
        assert_eq!(update.messages[0].text(), Some("4"));
        assert!(update.specialist_needed.is_none());

        let merged = state.apply(update);
        assert_eq!(merged.messages.len(), 2, "user turn plus the response");
        assert!(merged.messages.iter().all(|m| !m.is_system()));
    }

    /// **Scenario**: the directive embeds the criteria, and for a domain
    /// request it also carries the trigger's search guidance.
    #[test]
    fn directive_embeds_criteria_and_supplement() {
        let node = worker(MockLlm::new());
        let state = SidekickState::new("Find a Korean article", "article simplified");
        let plain = node.directive(&state, false);
        assert!(plain.contains("article simplified"));
        assert!(!plain.contains("KOREAN CONTENT"));
        let domain = node.directive(&state, true);
        assert!(domain.contains("KOREAN CONTENT"));
    }

    /// **Scenario**: once the specialist has produced output, the directive
    /// hands the worker that output verbatim.
    #[test]
    fn directive_embeds_specialist_output() {
        let node = worker(MockLlm::new());
        let mut state = SidekickState::new("Find a Korean article", "stored");
        state.specialist_output = Some(SpecialistOutput {
            articles: vec![Article {
                korean_text: "뉴스 요약".into(),
                english_translation: "news summary".into(),
                language_items: Vec::new(),
                date: None,
                link: None,
                title: None,
                source: None,
                topic: None,
            }],
        });
        let directive = node.directive(&state, false);
        assert!(directive.contains("Processed 1 article(s)"));
        assert!(directive.contains("뉴스 요약"));
    }

    /// **Scenario**: all four gates hold (domain request, Korean text in an
    /// executed tool result, no prior specialist output, no pending calls),
    /// so the worker raises specialist_needed.
    #[tokio::test]
    async fn delegates_when_all_gates_hold() {
        let node = worker(MockLlm::fixed("Found an article, summarizing."));
        let state = korean_state_with_tool_result();
        let update = node.run(&state).await.unwrap();
        assert_eq!(update.specialist_needed, Some(true));
    }

    /// **Scenario**: no tool has executed yet, so Korean text in the user
    /// message alone does not delegate.
    #[tokio::test]
    async fn no_delegation_before_tools_execute() {
        let node = worker(MockLlm::fixed("I'll search for one."));
        let state = SidekickState::new("한국 뉴스 기사를 찾아줘", "article simplified");
        let update = node.run(&state).await.unwrap();
        assert!(update.specialist_needed.is_none());
    }

    /// **Scenario**: the response still has pending tool calls; tools run
    /// first, delegation waits.
    #[tokio::test]
    async fn no_delegation_with_pending_tool_calls() {
        let llm = MockLlm::new().push(LlmResponse::with_tools(
            "",
            vec![ToolCall {
                id: "c2".into(),
                name: "fetch_page".into(),
                arguments: "{}".into(),
            }],
        ));
        let node = worker(llm);
        let state = korean_state_with_tool_result();
        let update = node.run(&state).await.unwrap();
        assert!(update.specialist_needed.is_none());
    }

    /// **Scenario**: specialist output already exists for this batch; the
    /// worker must not delegate again even though the trigger content is
    /// still in the history.
    #[tokio::test]
    async fn no_delegation_after_specialist_ran() {
        let node = worker(MockLlm::fixed("Stored the processed articles."));
        let mut state = korean_state_with_tool_result();
        state.specialist_output = Some(SpecialistOutput {
            articles: vec![Article {
                korean_text: "날씨".into(),
                english_translation: "weather".into(),
                language_items: Vec::new(),
                date: None,
                link: None,
                title: None,
                source: None,
                topic: None,
            }],
        });
        let update = node.run(&state).await.unwrap();
        assert!(update.specialist_needed.is_none());
    }

    /// **Scenario**: evaluator feedback and the clarification policy both
    /// show up in the directive depending on state flags.
    #[test]
    fn directive_reflects_feedback_and_user_input() {
        let node = worker(MockLlm::new());
        let mut state = SidekickState::new("task", "done well");
        state.feedback_on_work = Some("missing sources".into());
        state.user_input_needed = true;
        let directive = node.directive(&state, false);
        assert!(directive.contains("missing sources"));
        assert!(directive.contains("replied with clarifications"));

        state.user_input_needed = false;
        let directive = node.directive(&state, false);
        assert!(directive.contains("DO NOT perform the task"));
    }
}
