//! OpenAI-Compatible Provider
//!
//! Implementation of the LlmProvider trait for the chat-completions API.
//! The same wire format is spoken by OpenAI, DeepSeek, Qwen (DashScope
//! compatible mode), GLM and Ollama, so one provider covers all of them;
//! only the endpoint and authentication differ.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, MessageContent, MessageRole,
    ProviderConfig, ProviderType, StopReason, ToolCall, ToolDefinition, UsageStats,
};
use crate::http_client::build_http_client;

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl OpenAIProvider {
    /// Create a new provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy.as_deref(), config.timeout_secs)?;
        Ok(Self { config, client })
    }

    /// Get the API endpoint (override or the provider default)
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.config.provider.default_base_url())
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        messages: &[Message],
        system: Option<&str>,
        tools: &[ToolDefinition],
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "stream": false,
            "temperature": request_options
                .temperature_override
                .unwrap_or(self.config.temperature),
        });

        let mut openai_messages: Vec<serde_json::Value> = Vec::with_capacity(messages.len() + 1);
        if let Some(sys) = system {
            openai_messages.push(serde_json::json!({
                "role": "system",
                "content": sys
            }));
        }
        openai_messages.extend(messages.iter().map(message_to_openai));
        body["messages"] = serde_json::json!(openai_messages);

        if !tools.is_empty() {
            let openai_tools: Vec<serde_json::Value> = tools.iter().map(tool_to_openai).collect();
            body["tools"] = serde_json::json!(openai_tools);
        }

        body
    }
}

/// Convert a Message to chat-completions format
fn message_to_openai(message: &Message) -> serde_json::Value {
    let text_content = message.text_content();

    if message.role == MessageRole::Tool {
        let mut result_msg = serde_json::json!({ "role": "tool" });
        for content in &message.content {
            if let MessageContent::ToolResult {
                tool_use_id,
                content,
                ..
            } = content
            {
                result_msg["tool_call_id"] = serde_json::json!(tool_use_id);
                result_msg["content"] = serde_json::json!(content);
                break;
            }
        }
        return result_msg;
    }

    let role = match message.role {
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::System => "system",
        MessageRole::Tool => "tool",
    };

    let tool_calls: Vec<serde_json::Value> = message
        .content
        .iter()
        .filter_map(|c| match c {
            MessageContent::ToolUse { id, name, input } => Some(serde_json::json!({
                "id": id,
                "type": "function",
                "function": {
                    "name": name,
                    "arguments": input.to_string()
                }
            })),
            _ => None,
        })
        .collect();

    if tool_calls.is_empty() {
        return serde_json::json!({
            "role": role,
            "content": text_content
        });
    }

    // Some compatible APIs reject a missing content field on tool-call turns.
    let content = if text_content.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::json!(text_content)
    };
    serde_json::json!({
        "role": role,
        "content": content,
        "tool_calls": tool_calls
    })
}

/// Convert a ToolDefinition to chat-completions format
fn tool_to_openai(tool: &ToolDefinition) -> serde_json::Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.input_schema
        }
    })
}

/// Decode the JSON-encoded argument string of a tool call.
///
/// An empty string means "no arguments". Anything else that fails to decode
/// is a protocol error.
fn decode_arguments(name: &str, raw: &str) -> LlmResult<serde_json::Value> {
    if raw.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(raw).map_err(|e| LlmError::ParseError {
        message: format!("tool call '{}' has malformed arguments: {}", name, e),
    })
}

/// Parse a chat-completions response body
fn parse_response(response: OpenAIResponse) -> LlmResult<LlmResponse> {
    let choice = response.choices.into_iter().next();

    let mut content = None;
    let mut tool_calls = Vec::new();
    let mut finish_reason = None;

    if let Some(choice) = choice {
        finish_reason = choice.finish_reason;
        if let Some(msg) = choice.message {
            content = msg.content;
            for tc in msg.tool_calls.unwrap_or_default() {
                let arguments = decode_arguments(&tc.function.name, &tc.function.arguments)?;
                tool_calls.push(ToolCall {
                    id: tc.id,
                    name: tc.function.name,
                    arguments,
                });
            }
        }
    }

    let stop_reason = finish_reason
        .as_deref()
        .map(StopReason::from)
        .unwrap_or(StopReason::EndTurn);

    let usage = response
        .usage
        .map(|u| UsageStats {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    Ok(LlmResponse {
        content,
        tool_calls,
        stop_reason,
        usage,
        model: response.model,
    })
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn name(&self) -> &'static str {
        match self.config.provider {
            ProviderType::OpenAI => "openai",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Qwen => "qwen",
            ProviderType::Glm => "glm",
            ProviderType::Ollama => "ollama",
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => Some(key),
            _ if self.config.provider.requires_api_key() => {
                return Err(missing_api_key_error(self.name()));
            }
            _ => None,
        };

        let body = self.build_request_body(&messages, system.as_deref(), &tools, &request_options);
        debug!(
            provider = self.name(),
            model = %self.config.model,
            messages = messages.len(),
            tools = tools.len(),
            "sending chat completion request"
        );

        let mut request = self
            .client
            .post(self.base_url())
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(key) = api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if !(200..300).contains(&status) {
            return Err(parse_http_error(status, &body_text, self.name()));
        }

        let openai_response: OpenAIResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        let parsed = parse_response(openai_response)?;
        debug!(
            stop_reason = ?parsed.stop_reason,
            tool_calls = parsed.tool_calls.len(),
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "received chat completion"
        );
        Ok(parsed)
    }
}

/// Chat-completions response format
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    id: String,
    function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ResponseFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}
