//! Delegation trigger: when should the worker hand off to the specialist?
//!
//! The engine only needs a boolean "delegate now" signal; how it is
//! computed is domain logic, so the predicate is a trait the caller can
//! swap. The shipped [`KoreanLearningTrigger`] detects Korean language
//! learning requests and Korean text content.

use crate::state::SidekickState;

/// Domain predicate feeding the worker's delegation gates.
pub trait DelegationTrigger: Send + Sync {
    /// True when the conversation is asking for the specialist's domain at
    /// all (checked against user messages and the success criteria).
    fn is_domain_request(&self, state: &SidekickState) -> bool;

    /// True when a piece of text carries content the specialist can
    /// transform.
    fn has_domain_content(&self, text: &str) -> bool;

    /// Extra directive text the worker appends when the request is in
    /// domain (e.g. search guidance). None means no supplement.
    fn directive_supplement(&self) -> Option<&str> {
        None
    }
}

const ENGLISH_KEYWORDS: [&str; 5] = [
    "korean",
    "learn korean",
    "korean news",
    "korean article",
    "korean language",
];

const KOREAN_KEYWORDS: [&str; 5] = ["한국", "한국어", "한국 뉴스", "한국 기사", "한국어 학습"];

const SEARCH_GUIDANCE: &str = "\
CRITICAL KOREAN CONTENT REQUIREMENTS:
- When searching for Korean articles, news, or content, you MUST search using Korean language queries.
- Use Korean search terms in your search queries (e.g., \"한국 뉴스\", \"한국 기사\", not \"Korean news\").
- Navigate to Korean language websites (e.g., naver.com, daum.net, Korean news sites).
- Retrieve content that is written in Korean language ONLY - do not use English translations or English-language articles.
- If you find Korean content, the specialist agent will automatically process it for language learning.
- Your search queries should be in Korean when looking for Korean content.
";

/// Detects Korean learning requests: English keywords (case-insensitive),
/// Korean keywords (verbatim), or any Hangul syllable (U+AC00–U+D7A3) in
/// user messages or the success criteria.
#[derive(Debug, Default)]
pub struct KoreanLearningTrigger;

fn contains_hangul(text: &str) -> bool {
    text.chars().any(|c| ('\u{ac00}'..='\u{d7a3}').contains(&c))
}

impl DelegationTrigger for KoreanLearningTrigger {
    fn is_domain_request(&self, state: &SidekickState) -> bool {
        let mut user_text = String::new();
        for message in &state.messages {
            if let crate::message::Message::User(content) = message {
                user_text.push_str(content);
                user_text.push(' ');
            }
        }
        user_text.push_str(&state.success_criteria);

        let lowered = user_text.to_lowercase();
        let has_english_keyword = ENGLISH_KEYWORDS.iter().any(|k| lowered.contains(k));
        let has_korean_keyword = KOREAN_KEYWORDS.iter().any(|k| user_text.contains(k));
        has_english_keyword || has_korean_keyword || contains_hangul(&user_text)
    }

    fn has_domain_content(&self, text: &str) -> bool {
        contains_hangul(text)
    }

    fn directive_supplement(&self) -> Option<&str> {
        Some(SEARCH_GUIDANCE)
    }
}
