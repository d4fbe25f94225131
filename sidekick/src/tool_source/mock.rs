//! Mock ToolSource for tests and examples.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{ToolCallContent, ToolSource, ToolSourceError, ToolSpec};

/// Mock tool source: fixed tool list, canned results.
///
/// `call_tool` returns the per-name result when one was registered,
/// otherwise the default result. Unlisted names still resolve (the mock is
/// permissive), so tests can script tools without declaring schemas.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    results: HashMap<String, String>,
    default_result: String,
}

impl MockToolSource {
    /// One `search` tool; every call returns the given text.
    pub fn search_example(result: impl Into<String>) -> Self {
        Self {
            tools: vec![ToolSpec {
                name: "search".to_string(),
                description: Some("Search the web.".to_string()),
                input_schema: json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } }
                }),
            }],
            results: HashMap::new(),
            default_result: result.into(),
        }
    }

    /// Custom tool list with a shared default result.
    pub fn new(tools: Vec<ToolSpec>, default_result: impl Into<String>) -> Self {
        Self {
            tools,
            results: HashMap::new(),
            default_result: default_result.into(),
        }
    }

    /// Registers a canned result for one tool name (builder style).
    pub fn with_result_for(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.results.insert(name.into(), text.into());
        self
    }
}

impl Default for MockToolSource {
    fn default() -> Self {
        Self::search_example("no results")
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let text = self
            .results
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default_result.clone());
        Ok(ToolCallContent { text })
    }
}

/// Tool source whose every call fails; for error-path tests.
pub struct FailingToolSource;

#[async_trait]
impl ToolSource for FailingToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(Vec::new())
    }

    async fn call_tool(
        &self,
        name: &str,
        _arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        Err(ToolSourceError::Execution(format!("{name} is down")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: per-name results win over the default.
    #[tokio::test]
    async fn per_name_result_beats_default() {
        let tools = MockToolSource::search_example("default text")
            .with_result_for("fetch_page", "<html>안녕</html>");
        let got = tools.call_tool("fetch_page", json!({})).await.unwrap();
        assert_eq!(got.text, "<html>안녕</html>");
        let got = tools.call_tool("search", json!({})).await.unwrap();
        assert_eq!(got.text, "default text");
    }

    /// **Scenario**: the failing source reports an Execution error naming
    /// the tool.
    #[tokio::test]
    async fn failing_source_reports_tool_name() {
        let err = FailingToolSource
            .call_tool("search", json!({}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("search"));
    }
}
