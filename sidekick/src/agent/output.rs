//! Structured outputs produced by the evaluator and specialist capabilities.
//!
//! These are the schema-validated records behind `StructuredClient<T>`. The
//! engine never looks inside them; the worker forwards the specialist
//! payload to tools (e.g. a database tool) verbatim, so everything here is
//! serde-round-trippable.

use serde::{Deserialize, Serialize};

/// Evaluator verdict on the worker's latest response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorVerdict {
    /// Feedback on the assistant's response.
    pub feedback: String,
    /// Whether the success criteria have been met.
    pub success_criteria_met: bool,
    /// True if more input is needed from the user, or clarifications, or
    /// the assistant is stuck.
    pub user_input_needed: bool,
}

/// Kind of language learning item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageItemKind {
    Vocab,
    Grammar,
    SentencePattern,
}

/// One language learning item: a vocab word, grammar point, or sentence
/// pattern extracted from an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageItem {
    pub kind: LanguageItemKind,
    /// The Korean original text of the item.
    pub korean: String,
    /// English translation or explanation.
    pub english: String,
    /// Optional context or example sentence showing usage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A simplified article with its extracted language items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// The simplified (A2-level) Korean text.
    pub korean_text: String,
    /// English translation of the Korean text.
    pub english_translation: String,
    pub language_items: Vec<LanguageItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

/// Full structured result from the specialist: the processed articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialistOutput {
    pub articles: Vec<Article>,
}

impl SpecialistOutput {
    /// Human-readable summary appended to the conversation so the worker
    /// (and the transcript) can see what the specialist produced.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "[Specialist] Processed {} article(s).\n\n",
            self.articles.len()
        );
        for (i, article) in self.articles.iter().enumerate() {
            out.push_str(&format!("Article {}:\n", i + 1));
            out.push_str(&format!("Korean (A2 level): {}\n", article.korean_text));
            out.push_str(&format!("English: {}\n", article.english_translation));
            out.push_str(&format!(
                "Language items: {} items extracted\n",
                article.language_items.len()
            ));
            if let Some(title) = &article.title {
                out.push_str(&format!("Title: {title}\n"));
            }
            out.push('\n');
        }
        out
    }
}
