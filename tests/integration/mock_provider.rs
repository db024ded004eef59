//! Role-aware mock LLM provider.
//!
//! Answers depend on which agent phase is asking, identified by the system
//! prompt each phase sends.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use docsmith::services::plan_mode::prompts::{
    EXECUTOR_SYSTEM_PROMPT, PLANNER_SYSTEM_PROMPT, REFLECTOR_SYSTEM_PROMPT,
};
use docsmith_llm::{
    LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult, Message, StopReason,
    ToolCall, ToolDefinition, UsageStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Planner,
    Executor,
    Reflector,
}

type Route = Box<dyn Fn(Role, usize) -> LlmResult<LlmResponse> + Send + Sync>;

pub struct RoutingProvider {
    route: Route,
    counts: Mutex<HashMap<Role, usize>>,
    requests: Mutex<Vec<(Role, Vec<Message>)>>,
}

impl RoutingProvider {
    /// `route(role, n)` answers the n-th (0-based) call made by `role`.
    pub fn new(route: impl Fn(Role, usize) -> LlmResult<LlmResponse> + Send + Sync + 'static) -> Self {
        Self {
            route: Box::new(route),
            counts: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self, role: Role) -> usize {
        self.counts.lock().unwrap().get(&role).copied().unwrap_or(0)
    }

    pub fn requests(&self, role: Role) -> Vec<Vec<Message>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| *r == role)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl LlmProvider for RoutingProvider {
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
        _tools: Vec<ToolDefinition>,
        _options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let role = match system.as_deref() {
            Some(PLANNER_SYSTEM_PROMPT) => Role::Planner,
            Some(EXECUTOR_SYSTEM_PROMPT) => Role::Executor,
            Some(REFLECTOR_SYSTEM_PROMPT) => Role::Reflector,
            other => {
                return Err(LlmError::InvalidRequest {
                    message: format!("unexpected system prompt: {:?}", other),
                })
            }
        };
        let index = {
            let mut counts = self.counts.lock().unwrap();
            let entry = counts.entry(role).or_insert(0);
            *entry += 1;
            *entry - 1
        };
        self.requests.lock().unwrap().push((role, messages));
        (self.route)(role, index)
    }
}

pub fn text(content: &str) -> LlmResult<LlmResponse> {
    Ok(LlmResponse {
        content: Some(content.to_string()),
        tool_calls: vec![],
        stop_reason: StopReason::EndTurn,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    })
}

/// Finish signal with no content and no tool calls.
pub fn stop() -> LlmResult<LlmResponse> {
    Ok(LlmResponse {
        content: None,
        tool_calls: vec![],
        stop_reason: StopReason::from("stop"),
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    })
}

pub fn tool_call(id: &str, name: &str, arguments: Value) -> LlmResult<LlmResponse> {
    Ok(LlmResponse {
        content: None,
        tool_calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments,
        }],
        stop_reason: StopReason::ToolUse,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    })
}

pub const ONE_STEP_PLAN: &str = r#"{"overview":"X","steps":[{"id":1,"action":"Analyze entry","target":"index.ts","reason":"entry point"}],"focusAreas":["core"]}"#;

pub const COMPLETE: &str = r#"{"isComplete":true,"completeness":90,"missingAreas":[],"suggestions":[],"shouldContinue":false}"#;
