//! Reflector
//!
//! Judges whether the Knowledge Store is complete enough to publish. A
//! malformed verdict never fails the run: it is replaced by a fixed default
//! that stops exploration.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use docsmith_core::KnowledgeStore;
use docsmith_llm::{LlmProvider, LlmRequestOptions, Message};

use crate::utils::error::AppResult;

use super::parsing::parse_json_object;
use super::prompts::{reflector_prompt, REFLECTOR_SYSTEM_PROMPT};

/// Structured completeness verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionResult {
    pub is_complete: bool,
    /// 0-100
    pub completeness: u8,
    pub missing_areas: Vec<String>,
    pub suggestions: Vec<String>,
    pub should_continue: bool,
}

impl ReflectionResult {
    /// Verdict used whenever the model's answer cannot be read.
    pub fn fallback() -> Self {
        Self {
            is_complete: true,
            completeness: 70,
            missing_areas: Vec::new(),
            suggestions: Vec::new(),
            should_continue: false,
        }
    }
}

/// Parse a reflection response. `None` when no usable JSON object is present.
///
/// Individual fields that are missing or mistyped take their fallback value.
pub fn parse_reflection(content: Option<&str>) -> Option<ReflectionResult> {
    let text = content.filter(|t| !t.trim().is_empty())?;
    let value = match parse_json_object(text) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "reflection response is not a JSON object");
            return None;
        }
    };

    let defaults = ReflectionResult::fallback();
    let strings = |key: &str| -> Vec<String> {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    };

    Some(ReflectionResult {
        is_complete: value
            .get("isComplete")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.is_complete),
        completeness: value
            .get("completeness")
            .and_then(Value::as_f64)
            .map(|c| c.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(defaults.completeness),
        missing_areas: strings("missingAreas"),
        suggestions: strings("suggestions"),
        should_continue: value
            .get("shouldContinue")
            .and_then(Value::as_bool)
            .unwrap_or(defaults.should_continue),
    })
}

/// LLM-backed completeness reviewer.
pub struct Reflector {
    provider: Arc<dyn LlmProvider>,
}

impl Reflector {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Evaluate the Knowledge Store. Gateway failures are fatal; unreadable
    /// verdicts fall back to [`ReflectionResult::fallback`].
    pub async fn reflect(&self, memory: &KnowledgeStore) -> AppResult<ReflectionResult> {
        let messages = vec![Message::user(reflector_prompt(memory))];
        let response = self
            .provider
            .send_message(
                messages,
                Some(REFLECTOR_SYSTEM_PROMPT.to_string()),
                vec![],
                LlmRequestOptions::default(),
            )
            .await?;

        let result = match parse_reflection(response.content.as_deref()) {
            Some(r) => r,
            None => {
                warn!("could not parse reflection, assuming documentation is complete");
                ReflectionResult::fallback()
            }
        };

        info!(
            completeness = result.completeness,
            is_complete = result.is_complete,
            should_continue = result.should_continue,
            missing = result.missing_areas.len(),
            "reflection finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_helpers::{empty_response, MockLlmProvider};
    use docsmith_llm::LlmError;

    #[test]
    fn test_parse_full_verdict() {
        let text = r#"Here is my assessment:
{"isComplete": false, "completeness": 55.6, "missingAreas": ["cli", " ", "config"],
 "suggestions": ["document flags"], "shouldContinue": true}"#;
        let result = parse_reflection(Some(text)).unwrap();
        assert!(!result.is_complete);
        assert_eq!(result.completeness, 56);
        assert_eq!(result.missing_areas, vec!["cli", "config"]);
        assert_eq!(result.suggestions, vec!["document flags"]);
        assert!(result.should_continue);
    }

    #[test]
    fn test_parse_clamps_and_defaults_fields() {
        let result = parse_reflection(Some(r#"{"completeness": 140}"#)).unwrap();
        assert_eq!(result.completeness, 100);
        assert!(result.is_complete);
        assert!(!result.should_continue);
        assert!(result.missing_areas.is_empty());
    }

    #[test]
    fn test_parse_rejects_unusable_text() {
        assert_eq!(parse_reflection(None), None);
        assert_eq!(parse_reflection(Some("   ")), None);
        assert_eq!(parse_reflection(Some("Looks complete to me.")), None);
        assert_eq!(parse_reflection(Some(r#"{"isComplete": false, "miss"#)), None);
    }

    #[tokio::test]
    async fn test_reflect_falls_back_on_null_content() {
        let provider = Arc::new(MockLlmProvider::new(vec![Ok(empty_response())]));
        let reflector = Reflector::new(provider);
        let result = reflector.reflect(&KnowledgeStore::new()).await.unwrap();
        assert_eq!(result, ReflectionResult::fallback());
    }

    #[tokio::test]
    async fn test_reflect_sends_knowledge() {
        let provider = Arc::new(MockLlmProvider::with_texts(&[
            r#"{"isComplete": true, "completeness": 90, "missingAreas": [], "suggestions": [], "shouldContinue": false}"#,
        ]));
        let mut memory = KnowledgeStore::new();
        memory.add_insight("Uses a recursive descent parser");

        let reflector = Reflector::new(provider.clone());
        let result = reflector.reflect(&memory).await.unwrap();
        assert_eq!(result.completeness, 90);

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].tools.is_empty());
        assert!(calls[0].messages[0]
            .text_content()
            .contains("Uses a recursive descent parser"));
    }

    #[tokio::test]
    async fn test_reflect_gateway_error_is_fatal() {
        let provider = Arc::new(MockLlmProvider::new(vec![Err(LlmError::NetworkError {
            message: "connection reset".to_string(),
        })]));
        let reflector = Reflector::new(provider);
        assert!(reflector.reflect(&KnowledgeStore::new()).await.is_err());
    }
}
