//! Docsmith LLM
//!
//! The LLM Gateway: a thin, stateless request/response abstraction that turns
//! an ordered conversation plus a tool catalog into a single model turn.
//!
//! One transport is provided, `OpenAIProvider`, which speaks the
//! chat-completions protocol. OpenAI, DeepSeek, Qwen (DashScope compatible
//! mode), GLM and Ollama all expose that protocol and differ only in their
//! default endpoint.

pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;
