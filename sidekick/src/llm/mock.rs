//! Mock LLM capabilities for tests and examples.
//!
//! Both mocks play back a script: responses are returned in push order,
//! then the fallback (if any) repeats forever. Running past the script with
//! no fallback is a capability failure, which makes accidental extra loop
//! iterations fail tests loudly instead of spinning.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, StructuredClient};
use crate::message::Message;
use crate::tool_source::ToolSpec;

/// Scripted `LlmClient`.
pub struct MockLlm {
    script: Mutex<VecDeque<LlmResponse>>,
    fallback: Option<LlmResponse>,
}

impl MockLlm {
    /// Empty script, no fallback: any invoke fails.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
        }
    }

    /// Returns the same text response on every invoke.
    pub fn fixed(content: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(LlmResponse::text(content)),
        }
    }

    /// Queues one scripted response (builder style).
    pub fn push(self, response: LlmResponse) -> Self {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(response);
        self
    }
}

impl Default for MockLlm {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        if let Some(response) = self.script.lock().expect("mock script lock").pop_front() {
            return Ok(response);
        }
        self.fallback
            .clone()
            .ok_or_else(|| AgentError::Capability("mock llm script exhausted".into()))
    }
}

/// Scripted `StructuredClient<T>`.
pub struct MockStructured<T> {
    script: Mutex<VecDeque<T>>,
    fallback: Option<T>,
}

impl<T: Clone> MockStructured<T> {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: None,
        }
    }

    /// Returns the same record on every invoke.
    pub fn fixed(value: T) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(value),
        }
    }

    /// Queues one scripted record (builder style).
    pub fn push(self, value: T) -> Self {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(value);
        self
    }
}

impl<T: Clone> Default for MockStructured<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> StructuredClient<T> for MockStructured<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn invoke(&self, _messages: &[Message]) -> Result<T, AgentError> {
        if let Some(value) = self.script.lock().expect("mock script lock").pop_front() {
            return Ok(value);
        }
        self.fallback
            .clone()
            .ok_or_else(|| AgentError::Capability("mock structured script exhausted".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: scripted responses come back in push order, then the
    /// mock fails with a capability error.
    #[tokio::test]
    async fn scripted_responses_in_order_then_fail() {
        let llm = MockLlm::new()
            .push(LlmResponse::text("first"))
            .push(LlmResponse::text("second"));
        assert_eq!(llm.invoke(&[], &[]).await.unwrap().content, "first");
        assert_eq!(llm.invoke(&[], &[]).await.unwrap().content, "second");
        assert!(matches!(
            llm.invoke(&[], &[]).await,
            Err(AgentError::Capability(_))
        ));
    }

    /// **Scenario**: a fixed mock repeats forever.
    #[tokio::test]
    async fn fixed_repeats() {
        let llm = MockLlm::fixed("same");
        for _ in 0..3 {
            assert_eq!(llm.invoke(&[], &[]).await.unwrap().content, "same");
        }
    }

    /// **Scenario**: structured mock plays its script then falls back.
    #[tokio::test]
    async fn structured_script_then_fallback() {
        let client = MockStructured::<u32>::fixed(0).push(7);
        assert_eq!(StructuredClient::invoke(&client, &[]).await.unwrap(), 7);
        assert_eq!(StructuredClient::invoke(&client, &[]).await.unwrap(), 0);
        assert_eq!(StructuredClient::invoke(&client, &[]).await.unwrap(), 0);
    }
}
