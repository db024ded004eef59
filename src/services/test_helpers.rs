//! Test Helpers
//!
//! A scripted `LlmProvider` shared by the unit tests of the agent phases.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use docsmith_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, StopReason,
    ToolCall, ToolDefinition, UsageStats,
};

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub system: Option<String>,
    pub tools: Vec<ToolDefinition>,
}

/// A mock LLM provider that returns predefined responses in order.
pub struct MockLlmProvider {
    /// Responses to return in sequence; each call pops the first response.
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    /// Returned for every call once `responses` is drained, if set.
    repeat: Option<LlmResponse>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            repeat: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with the same response.
    pub fn repeating(response: LlmResponse) -> Self {
        Self {
            repeat: Some(response),
            ..Self::new(vec![])
        }
    }

    pub fn with_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        _options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages,
            system,
            tools,
        });
        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            return responses.remove(0);
        }
        match &self.repeat {
            Some(r) => Ok(r.clone()),
            None => Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            }),
        }
    }
}

/// A terminal text turn.
pub fn text_response(text: &str) -> LlmResponse {
    LlmResponse {
        content: Some(text.to_string()),
        tool_calls: vec![],
        stop_reason: StopReason::EndTurn,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    }
}

/// A terminal turn with no content at all.
pub fn empty_response() -> LlmResponse {
    LlmResponse {
        content: None,
        ..text_response("")
    }
}

/// A turn requesting a single tool call.
pub fn tool_call_response(id: &str, name: &str, arguments: Value) -> LlmResponse {
    LlmResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }],
        stop_reason: StopReason::ToolUse,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    }
}
