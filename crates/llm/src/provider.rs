//! LLM Provider Trait
//!
//! The single seam between the agent and any chat-completions backend.

use async_trait::async_trait;

use super::types::{
    LlmError, LlmRequestOptions, LlmResponse, LlmResult, Message, ToolDefinition,
};

/// Trait that all LLM providers must implement.
///
/// One request, one response. Retries, streaming and backoff are not part of
/// the contract; any error returned here is treated as fatal by callers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "openai")
    fn name(&self) -> &'static str;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Send a conversation and wait for the complete response.
    ///
    /// `system` is prepended as a system message when present. `tools` may be
    /// empty, in which case the model is expected to answer in plain text.
    async fn send_message(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
        tools: Vec<ToolDefinition>,
        options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse>;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::AuthenticationFailed {
        message: format!("API key not configured for {}", provider),
    }
}

/// Map a non-success HTTP status to an `LlmError`
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
            retry_after: None,
        },
        400 | 422 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, body),
        },
    }
}
